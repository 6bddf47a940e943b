use crate::domain::models::{MessageSeverity, StatusMessage};
use crate::infrastructure::bluetooth::protocol;
use crate::presentation::app::BleBossApp;
use crate::presentation::components::Components;
use eframe::egui;

pub fn render(app: &mut BleBossApp, ui: &mut egui::Ui) {
    Components::heading(ui, "Settings");
    ui.add_space(12.0);

    let Ok(mut settings) = app.settings.lock() else {
        ui.label("Settings are unavailable.");
        return;
    };
    let settings_mut = settings.get_mut();

    Components::card(ui, "Scanning", |ui| {
        ui.horizontal(|ui| {
            ui.label("Adapter index:");
            ui.add(egui::DragValue::new(&mut settings_mut.adapter_index).range(0..=8));
        });
        ui.checkbox(
            &mut settings_mut.show_unnamed_devices,
            "List devices that advertise no name",
        );
        ui.horizontal(|ui| {
            ui.label("Service filter:");
            ui.add(
                egui::TextEdit::singleline(&mut app.filter_input)
                    .hint_text("e.g. 180d, 6e400001-b5a3-f393-e0a9-e50e24dcca9e"),
            );
        });
        ui.label(
            egui::RichText::new("Comma separated UUIDs. Empty lists every device.")
                .italics()
                .size(12.0),
        );
    });

    ui.add_space(10.0);

    Components::card(ui, "Connection", |ui| {
        egui::Grid::new("connection_settings")
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Connect timeout (ms):");
                ui.add(
                    egui::Slider::new(&mut settings_mut.connect_timeout_ms, 1000..=60_000)
                        .step_by(500.0),
                );
                ui.end_row();
                ui.label("Attempts:");
                ui.add(egui::Slider::new(&mut settings_mut.connect_max_retries, 1..=10));
                ui.end_row();
                ui.label("Retry delay (ms):");
                ui.add(egui::Slider::new(
                    &mut settings_mut.connect_retry_delay_ms,
                    0..=10_000,
                ));
                ui.end_row();
                ui.label("Discovery timeout (ms):");
                ui.add(
                    egui::Slider::new(&mut settings_mut.discover_timeout_ms, 1000..=60_000)
                        .step_by(500.0),
                );
                ui.end_row();
            });
    });

    ui.add_space(10.0);

    Components::card(ui, "Logging", |ui| {
        ui.horizontal(|ui| {
            ui.label("Verbosity Level:");
            egui::ComboBox::from_id_salt("log_level")
                .selected_text(&settings_mut.log_settings.level)
                .show_ui(ui, |ui| {
                    for level in &["trace", "debug", "info", "warn", "error"] {
                        ui.selectable_value(
                            &mut settings_mut.log_settings.level,
                            level.to_string(),
                            *level,
                        );
                    }
                });
        });

        ui.checkbox(
            &mut settings_mut.log_settings.console_logging_enabled,
            "Console logs",
        );
        ui.checkbox(
            &mut settings_mut.log_settings.file_logging_enabled,
            "File logs",
        );

        if settings_mut.log_settings.file_logging_enabled {
            ui.indent("file_logs", |ui| {
                ui.horizontal(|ui| {
                    ui.label("Directory:");
                    ui.text_edit_singleline(&mut settings_mut.log_settings.log_dir);
                });
                ui.horizontal(|ui| {
                    ui.label("Rotation:");
                    egui::ComboBox::from_id_salt("log_rot")
                        .selected_text(&settings_mut.log_settings.rotation)
                        .show_ui(ui, |ui| {
                            for rot in &["daily", "hourly", "minutely", "never"] {
                                ui.selectable_value(
                                    &mut settings_mut.log_settings.rotation,
                                    rot.to_string(),
                                    *rot,
                                );
                            }
                        });
                });
            });
        }
        ui.label(
            egui::RichText::new("Restart required for log changes.")
                .italics()
                .size(12.0),
        );
    });

    ui.add_space(10.0);

    if ui.button("Save").clicked() {
        let filter = split_filter(&app.filter_input);
        let message = match protocol::parse_service_filter(&filter) {
            Err(e) => StatusMessage::new(e.to_string(), MessageSeverity::Error),
            Ok(_) => {
                settings_mut.scan_service_filter = filter;
                match settings.save() {
                    Ok(()) => StatusMessage::new(
                        format!("Settings saved to {}", settings.path().display()),
                        MessageSeverity::Success,
                    ),
                    Err(e) => StatusMessage::new(
                        format!("Failed to save settings: {}", e),
                        MessageSeverity::Error,
                    ),
                }
            }
        };
        app.session.status_message = Some(message);
    }
}

fn split_filter(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_filter() {
        assert_eq!(split_filter(" 180d, ,180F "), vec!["180d", "180F"]);
        assert!(split_filter("").is_empty());
    }
}
