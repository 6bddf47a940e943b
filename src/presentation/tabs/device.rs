use crate::domain::models::ConnectionStatus;
use crate::presentation::app::BleBossApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut BleBossApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Device");
    ui.add_space(12.0);

    ui_connection_panel(app, ui);
    ui.add_space(12.0);
    ui_services_panel(app, ui);
}

fn ui_connection_panel(app: &mut BleBossApp, ui: &mut egui::Ui) {
    Components::card(ui, "Connection", |ui| {
        let (status_text, bg_color, text_color) = match app.session.connection_status {
            ConnectionStatus::Connected => (
                "CONNECTED",
                egui::Color32::from_rgb(0, 170, 80),
                egui::Color32::WHITE,
            ),
            ConnectionStatus::Connecting => (
                "CONNECTING...",
                egui::Color32::from_rgb(255, 200, 0),
                egui::Color32::BLACK,
            ),
            ConnectionStatus::Disconnected => (
                "DISCONNECTED",
                egui::Color32::from_gray(100),
                egui::Color32::WHITE,
            ),
            ConnectionStatus::Error => (
                "ERROR",
                egui::Color32::from_rgb(220, 50, 50),
                egui::Color32::WHITE,
            ),
        };
        Components::status_banner(ui, status_text, bg_color, text_color);
        ui.add_space(8.0);

        let Some(address) = app.session.active_device else {
            ui.label("Pick a device on the Scanner tab to connect.");
            return;
        };

        let name = app
            .session
            .results
            .get(&address)
            .map(|obs| obs.display_name().to_string())
            .unwrap_or_else(|| "Unnamed".to_string());

        egui::Grid::new("device_grid")
            .spacing([30.0, 6.0])
            .show(ui, |ui| {
                ui.label("Name:");
                ui.label(name);
                ui.end_row();
                ui.label("Address:");
                ui.monospace(address.to_string());
                ui.end_row();
            });

        ui.horizontal(|ui| {
            match app.session.connection_status {
                ConnectionStatus::Connected => {
                    if ui.button("Disconnect").clicked() {
                        let command = app.session.disconnect();
                        app.dispatch(command);
                    }
                }
                ConnectionStatus::Connecting => {
                    ui.spinner();
                }
                ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                    if ui.button("Reconnect").clicked() {
                        let command = app.session.connect(address);
                        app.dispatch(command);
                    }
                }
            }
        });
    });
}

fn ui_services_panel(app: &BleBossApp, ui: &mut egui::Ui) {
    if app.session.connection_status != ConnectionStatus::Connected {
        return;
    }

    Components::card(ui, "GATT Services", |ui| {
        if app.session.services.is_empty() {
            ui.label("No services discovered.");
            return;
        }

        for (i, service) in app.session.services.iter().enumerate() {
            let title = if service.primary {
                service.label()
            } else {
                format!("{} (secondary)", service.label())
            };
            egui::CollapsingHeader::new(title)
                .id_salt(("service", i))
                .default_open(true)
                .show(ui, |ui| {
                    if service.characteristics.is_empty() {
                        ui.label(egui::RichText::new("no characteristics").weak());
                    }
                    for characteristic in &service.characteristics {
                        ui.horizontal(|ui| {
                            ui.monospace(format!("|-- {}", characteristic.uuid));
                            ui.label(
                                egui::RichText::new(characteristic.properties.join(", ")).weak(),
                            );
                        });
                    }
                });
        }
    });
}
