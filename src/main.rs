mod domain;
mod infrastructure;
mod presentation;

use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([480.0, 400.0])
            .with_title("BLE Boss"),
        ..Default::default()
    };

    eframe::run_native(
        "BLE Boss",
        options,
        Box::new(|cc| Ok(Box::new(presentation::app::BleBossApp::new(cc)))),
    )
}
