use crate::domain::models::{MessageSeverity, StatusMessage};
use eframe::egui;

pub struct Components;

impl Components {
    pub fn heading(ui: &mut egui::Ui, text: &str) {
        ui.heading(egui::RichText::new(text).strong());
    }

    pub fn card<R>(
        ui: &mut egui::Ui,
        title: &str,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        let stroke = ui.style().visuals.widgets.noninteractive.bg_stroke;
        let bg = ui.style().visuals.widgets.noninteractive.bg_fill;

        egui::Frame::none()
            .inner_margin(egui::Margin::same(12.0))
            .rounding(egui::Rounding::same(6.0))
            .stroke(stroke)
            .fill(bg)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong().size(16.0));
                    ui.add_space(6.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
    }

    pub fn status_banner(
        ui: &mut egui::Ui,
        text: &str,
        bg_color: egui::Color32,
        text_color: egui::Color32,
    ) {
        ui.add_sized(
            [ui.available_width(), 30.0],
            egui::Label::new(
                egui::RichText::new(text)
                    .color(text_color)
                    .background_color(bg_color)
                    .size(15.0)
                    .strong(),
            )
            .wrap_mode(egui::TextWrapMode::Extend),
        );
    }

    pub fn severity_color(severity: MessageSeverity) -> egui::Color32 {
        match severity {
            MessageSeverity::Info => egui::Color32::from_rgb(40, 110, 220),
            MessageSeverity::Success => egui::Color32::from_rgb(0, 150, 0),
            MessageSeverity::Warning => egui::Color32::from_rgb(200, 150, 0),
            MessageSeverity::Error => egui::Color32::RED,
        }
    }

    pub fn status_line(ui: &mut egui::Ui, message: Option<&StatusMessage>) {
        ui.horizontal(|ui| match message {
            Some(msg) => {
                ui.label(
                    egui::RichText::new(&msg.message)
                        .color(Self::severity_color(msg.severity)),
                );
            }
            None => {
                ui.label(egui::RichText::new("Ready").weak());
            }
        });
    }
}
