use crate::domain::address::DeviceAddress;
use crate::domain::models::{AdapterStatus, ScanObservation, SignalQuality, Tab};
use crate::presentation::app::BleBossApp;
use crate::presentation::components::Components;
use crate::presentation::theme;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

struct Row {
    address: DeviceAddress,
    name: String,
    rssi: Option<i16>,
    quality: SignalQuality,
}

pub fn render(app: &mut BleBossApp, ui: &mut egui::Ui) {
    Components::heading(ui, "BLE Scanner");
    ui.add_space(12.0);

    ui_adapter_banner(app, ui);
    ui_scan_controls(app, ui);
    ui.add_space(12.0);
    ui_device_table(app, ui);
}

fn ui_adapter_banner(app: &BleBossApp, ui: &mut egui::Ui) {
    match &app.session.adapter {
        AdapterStatus::Unavailable { reason } => {
            Components::status_banner(
                ui,
                &format!("BLUETOOTH UNAVAILABLE: {}", reason),
                egui::Color32::from_rgb(220, 60, 60),
                egui::Color32::WHITE,
            );
            ui.add_space(8.0);
        }
        AdapterStatus::Unknown => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Looking for a Bluetooth adapter...");
            });
        }
        AdapterStatus::Available { name } => {
            ui.label(egui::RichText::new(format!("Adapter: {}", name)).weak());
        }
    }
}

fn ui_scan_controls(app: &mut BleBossApp, ui: &mut egui::Ui) {
    let width = ui.available_width();

    let start = ui.add_enabled(
        app.session.can_start_scan(),
        egui::Button::new("Start BLE scan").min_size(egui::vec2(width, 0.0)),
    );
    if start.clicked() {
        let command = app.session.start_scan();
        app.dispatch(command);
    }

    let stop = ui.add_enabled(
        app.session.can_stop_scan(),
        egui::Button::new("Stop BLE scan").min_size(egui::vec2(width, 0.0)),
    );
    if stop.clicked() {
        let command = app.session.stop_scan();
        app.dispatch(command);
    }

    let display = ui.add_enabled(
        app.session.can_report_devices(),
        egui::Button::new("Display list of devices").min_size(egui::vec2(width, 0.0)),
    );
    if display.clicked() {
        app.session.report_device_count();
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label("Address:");
        ui.add(
            egui::TextEdit::singleline(&mut app.address_input)
                .hint_text("AA:BB:CC:DD:EE:FF")
                .desired_width(160.0),
        );
        let connect = ui.add_enabled(
            app.session.can_connect() && !app.address_input.trim().is_empty(),
            egui::Button::new("Connect by address"),
        );
        if connect.clicked() {
            let command = app.session.connect_to_input(&app.address_input);
            if command.is_some() {
                app.selected_tab = Tab::Device;
            }
            app.dispatch(command);
        }
    });
}

fn ui_device_table(app: &mut BleBossApp, ui: &mut egui::Ui) {
    let show_unnamed = app
        .settings
        .lock()
        .map(|s| s.get().show_unnamed_devices)
        .unwrap_or(false);

    let visible: Box<dyn Iterator<Item = &ScanObservation> + '_> = if show_unnamed {
        Box::new(app.session.results.iter())
    } else {
        Box::new(app.session.results.named())
    };
    let rows: Vec<Row> = visible
        .map(|obs| Row {
            address: obs.address,
            name: obs.display_name().to_string(),
            rssi: obs.rssi,
            quality: obs.signal_quality(),
        })
        .collect();

    ui.horizontal(|ui| {
        ui.label(format!(
            "{} listed / {} seen",
            rows.len(),
            app.session.results.len()
        ));
        if app.session.is_scanning {
            ui.spinner();
        }
    });

    if rows.is_empty() {
        return;
    }

    let can_connect = app.session.can_connect();
    let active = app.session.active_device;
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(140.0))
        .column(Column::auto().at_least(150.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Address");
            });
            header.col(|ui| {
                ui.strong("RSSI");
            });
            header.col(|_| {});
        })
        .body(|mut body| {
            for row in &rows {
                body.row(32.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(&row.name);
                    });
                    table_row.col(|ui| {
                        ui.monospace(row.address.to_string());
                    });
                    table_row.col(|ui| {
                        let text = row
                            .rssi
                            .map(|r| format!("{} dBm", r))
                            .unwrap_or_else(|| "n/a".to_string());
                        ui.label(egui::RichText::new(text).color(theme::signal_color(row.quality)));
                    });
                    table_row.col(|ui| {
                        let label = if active == Some(row.address) {
                            "Reconnect"
                        } else {
                            "Connect"
                        };
                        if ui.add_enabled(can_connect, egui::Button::new(label)).clicked() {
                            clicked = Some(row.address);
                        }
                    });
                });
            }
        });

    if let Some(address) = clicked {
        app.address_input = address.to_string();
        let command = app.session.connect(address);
        app.dispatch(command);
        app.selected_tab = Tab::Device;
    }
}
