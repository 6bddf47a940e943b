use crate::domain::models::SignalQuality;
use eframe::egui;

pub struct Palette {
    pub bg: egui::Color32,
    pub fg: egui::Color32,
    pub stroke: egui::Color32,
    pub accent: egui::Color32,
    pub hover: egui::Color32,
}

impl Palette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                bg: egui::Color32::from_rgb(24, 26, 30),
                fg: egui::Color32::from_gray(230),
                stroke: egui::Color32::from_gray(90),
                accent: egui::Color32::from_rgb(64, 140, 255),
                hover: egui::Color32::from_rgb(44, 60, 90),
            }
        } else {
            Self {
                bg: egui::Color32::from_rgb(246, 247, 249),
                fg: egui::Color32::from_gray(20),
                stroke: egui::Color32::from_gray(170),
                accent: egui::Color32::from_rgb(0, 105, 230),
                hover: egui::Color32::from_rgb(220, 232, 252),
            }
        }
    }
}

pub fn signal_color(quality: SignalQuality) -> egui::Color32 {
    match quality {
        SignalQuality::Excellent => egui::Color32::from_rgb(0, 170, 80),
        SignalQuality::Good => egui::Color32::from_rgb(120, 170, 0),
        SignalQuality::Fair => egui::Color32::from_rgb(220, 150, 0),
        SignalQuality::Weak => egui::Color32::from_rgb(220, 60, 60),
        SignalQuality::Unknown => egui::Color32::from_gray(140),
    }
}

pub fn configure_style(ctx: &egui::Context, is_dark: bool) {
    let mut style = (*ctx.style()).clone();
    style.visuals = if is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    let palette = Palette::new(is_dark);

    style
        .text_styles
        .iter_mut()
        .for_each(|(text_style, font_id)| {
            font_id.size = match text_style {
                egui::TextStyle::Heading => 24.0,
                egui::TextStyle::Body | egui::TextStyle::Button => 14.0,
                _ => font_id.size,
            };
        });

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    let rounding = egui::Rounding::same(4.0);
    style.visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, palette.stroke);
    style.visuals.widgets.noninteractive.bg_fill = palette.bg;
    style.visuals.widgets.noninteractive.rounding = rounding;
    style.visuals.widgets.inactive.rounding = rounding;
    style.visuals.widgets.hovered.rounding = rounding;
    style.visuals.widgets.hovered.weak_bg_fill = palette.hover;
    style.visuals.widgets.active.rounding = rounding;
    style.visuals.widgets.active.bg_fill = palette.accent;

    style.visuals.selection.bg_fill = palette.accent;
    style.visuals.panel_fill = palette.bg;
    style.visuals.window_fill = palette.bg;
    style.visuals.override_text_color = Some(palette.fg);

    ctx.set_style(style);
}
