use crate::domain::models::{
    AppEvent, BluetoothCommand, ConnectionStatus, MessageSeverity, StatusMessage, Tab,
};
use crate::domain::session::Session;
use crate::domain::settings::SettingsService;
use crate::infrastructure::bluetooth::BluetoothService;
use crate::infrastructure::logging::{self, LoggingGuard};
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

pub struct BleBossApp {
    pub(crate) settings: Arc<Mutex<SettingsService>>,

    // Bluetooth worker
    pub(crate) bluetooth_tx: mpsc::UnboundedSender<BluetoothCommand>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<AppEvent>,

    pub(crate) session: Session,

    // UI State
    pub(crate) selected_tab: Tab,
    pub(crate) is_dark_mode: bool,
    pub(crate) filter_input: String,
    pub(crate) address_input: String,

    _logging_guard: Option<LoggingGuard>,
}

impl BleBossApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_service = SettingsService::new().unwrap_or_else(|e| {
            eprintln!("Failed to resolve settings path, using ./settings.json: {}", e);
            SettingsService::with_path("settings.json".into())
        });

        let logging_guard = logging::init_logger(&settings_service.get().log_settings)
            .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
            .ok();

        info!("Starting BLE Boss");

        let is_dark_mode = settings_service.get().dark_mode;
        let filter_input = settings_service.get().scan_service_filter.join(", ");
        crate::presentation::theme::configure_style(&cc.egui_ctx, is_dark_mode);

        let settings = Arc::new(Mutex::new(settings_service));
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (bt_cmd_tx, bt_cmd_rx) = mpsc::unbounded_channel();

        spawn_bluetooth_worker(bt_cmd_rx, event_tx, settings.clone(), cc.egui_ctx.clone());

        Self {
            settings,
            bluetooth_tx: bt_cmd_tx,
            event_rx,
            session: Session::new(),
            selected_tab: Tab::Scanner,
            is_dark_mode,
            filter_input,
            address_input: String::new(),
            _logging_guard: logging_guard,
        }
    }

    /// Forward a command produced by a session button handler.
    pub(crate) fn dispatch(&self, command: Option<BluetoothCommand>) {
        if let Some(command) = command {
            if self.bluetooth_tx.send(command).is_err() {
                error!("Bluetooth worker is gone");
            }
        }
    }
}

/// Run the Bluetooth service on its own single-threaded runtime.
fn spawn_bluetooth_worker(
    mut commands: mpsc::UnboundedReceiver<BluetoothCommand>,
    events: mpsc::UnboundedSender<AppEvent>,
    settings: Arc<Mutex<SettingsService>>,
    ctx: egui::Context,
) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to create tokio runtime for Bluetooth: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            let mut bt_service = BluetoothService::new(events.clone(), settings);
            bt_service.probe_adapter().await;
            ctx.request_repaint();

            while let Some(cmd) = commands.recv().await {
                match cmd {
                    BluetoothCommand::StartScan => {
                        if let Err(e) = bt_service.start_scan().await {
                            error!("onScanFailed: {}", e);
                            let _ = events.send(AppEvent::ScanFailed(e.to_string()));
                        }
                    }
                    BluetoothCommand::StopScan => {
                        if let Err(e) = bt_service.stop_scan().await {
                            error!("Failed to stop scan: {}", e);
                        }
                    }
                    BluetoothCommand::Connect(address) => {
                        if let Err(e) = bt_service.connect(address).await {
                            error!("Error encountered for {}: {}", address, e);
                            let _ = events.send(AppEvent::LogMessage(StatusMessage::new(
                                format!("Connection failed: {}", e),
                                MessageSeverity::Error,
                            )));
                            let _ = events.send(AppEvent::ConnectionChanged {
                                address,
                                status: ConnectionStatus::Error,
                            });
                        }
                    }
                    BluetoothCommand::Disconnect => bt_service.disconnect().await,
                }
                ctx.request_repaint();
            }
        });
    });
}

impl eframe::App for BleBossApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.session.apply(event);
        }

        // Scan results arrive continuously
        ctx.request_repaint_after(Duration::from_millis(100));

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.selectable_value(&mut self.selected_tab, Tab::Scanner, "Scanner");
                ui.selectable_value(&mut self.selected_tab, Tab::Device, "Device");
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, "Settings");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let switch_icon = if self.is_dark_mode {
                        "☀ Light"
                    } else {
                        "🌙 Dark"
                    };
                    if ui.button(switch_icon).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        crate::presentation::theme::configure_style(ctx, self.is_dark_mode);
                        if let Ok(mut settings) = self.settings.lock() {
                            settings.get_mut().dark_mode = self.is_dark_mode;
                        }
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            crate::presentation::components::Components::status_line(
                ui,
                self.session.status_message.as_ref(),
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(800.0);
                    ui.add_space(12.0);

                    use crate::presentation::tabs;
                    match self.selected_tab {
                        Tab::Scanner => tabs::scanner::render(self, ui),
                        Tab::Device => tabs::device::render(self, ui),
                        Tab::Settings => tabs::settings::render(self, ui),
                    }
                });
            });
        });
    }
}
