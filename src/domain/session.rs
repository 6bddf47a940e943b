//! Session State
//!
//! Everything the UI shows, folded from button presses and worker events.
//! Button handlers return the [`BluetoothCommand`] to forward, or `None` when
//! the button is disabled in the current state.

use crate::domain::address::DeviceAddress;
use crate::domain::gatt::GattService;
use crate::domain::models::{
    AdapterStatus, AppEvent, BluetoothCommand, ConnectionStatus, MessageSeverity, StatusMessage,
};
use crate::domain::scan_results::{ScanResults, Upsert};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Session {
    pub adapter: AdapterStatus,
    pub is_scanning: bool,
    pub results: ScanResults,
    pub active_device: Option<DeviceAddress>,
    pub connection_status: ConnectionStatus,
    pub services: Vec<GattService>,
    pub status_message: Option<StatusMessage>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            adapter: AdapterStatus::Unknown,
            is_scanning: false,
            results: ScanResults::new(),
            active_device: None,
            connection_status: ConnectionStatus::Disconnected,
            services: Vec::new(),
            status_message: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_start_scan(&self) -> bool {
        !self.is_scanning && !self.adapter.is_unavailable()
    }

    pub fn can_stop_scan(&self) -> bool {
        self.is_scanning
    }

    pub fn can_report_devices(&self) -> bool {
        !self.is_scanning
    }

    pub fn can_connect(&self) -> bool {
        self.connection_status != ConnectionStatus::Connecting
    }

    pub fn start_scan(&mut self) -> Option<BluetoothCommand> {
        if !self.can_start_scan() {
            return None;
        }
        self.results.clear();
        self.is_scanning = true;
        Some(BluetoothCommand::StartScan)
    }

    pub fn stop_scan(&mut self) -> Option<BluetoothCommand> {
        if !self.can_stop_scan() {
            return None;
        }
        self.is_scanning = false;
        Some(BluetoothCommand::StopScan)
    }

    /// Logs and returns the number of listed devices.
    pub fn report_device_count(&mut self) -> Option<usize> {
        if !self.can_report_devices() {
            return None;
        }
        let count = self.results.len();
        info!("Device list size: {}", count);
        self.status_message = Some(StatusMessage::new(
            format!("{} device(s) in list", count),
            MessageSeverity::Info,
        ));
        Some(count)
    }

    pub fn connect(&mut self, address: DeviceAddress) -> Option<BluetoothCommand> {
        if !self.can_connect() {
            return None;
        }
        self.active_device = Some(address);
        self.connection_status = ConnectionStatus::Connecting;
        self.services.clear();
        Some(BluetoothCommand::Connect(address))
    }

    /// Connect to an address typed by the user, e.g. for a device that has
    /// not been listed yet.
    pub fn connect_to_input(&mut self, input: &str) -> Option<BluetoothCommand> {
        match input.parse::<DeviceAddress>() {
            Ok(address) => self.connect(address),
            Err(e) => {
                self.status_message = Some(StatusMessage::new(
                    format!("Invalid address '{}': {}", input.trim(), e),
                    MessageSeverity::Error,
                ));
                None
            }
        }
    }

    pub fn disconnect(&mut self) -> Option<BluetoothCommand> {
        self.active_device.map(|_| BluetoothCommand::Disconnect)
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::AdapterStatus(status) => {
                if status.is_unavailable() {
                    self.is_scanning = false;
                }
                self.adapter = status;
            }
            AppEvent::DeviceFound(observation) => {
                // Late events after a stop must not repopulate the list
                if !self.is_scanning {
                    return;
                }
                if let Upsert::Inserted(index) = self.results.upsert(observation) {
                    debug!("Listed device #{}", index);
                }
            }
            AppEvent::ScanFailed(reason) => {
                self.is_scanning = false;
                self.status_message = Some(StatusMessage::new(
                    format!("Scan failed: {}", reason),
                    MessageSeverity::Error,
                ));
            }
            AppEvent::ConnectionChanged { address, status } => {
                if self.active_device != Some(address) {
                    warn!("Ignoring {:?} for inactive device {}", status, address);
                    return;
                }
                self.connection_status = status;
                match status {
                    ConnectionStatus::Connected => {
                        self.status_message = Some(StatusMessage::new(
                            format!("Connected to {}", address),
                            MessageSeverity::Success,
                        ));
                    }
                    ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                        self.services.clear();
                    }
                    ConnectionStatus::Connecting => {}
                }
            }
            AppEvent::ServicesDiscovered { address, services } => {
                if self.active_device != Some(address) {
                    return;
                }
                self.services = services;
            }
            AppEvent::LogMessage(msg) => {
                self.status_message = Some(msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gatt::uuid_from_short;
    use crate::domain::models::ScanObservation;

    fn addr(last: u8) -> DeviceAddress {
        DeviceAddress::new([0x10, 0x20, 0x30, 0x40, 0x50, last])
    }

    fn found(last: u8, rssi: i16) -> AppEvent {
        AppEvent::DeviceFound(ScanObservation {
            address: addr(last),
            name: Some(format!("dev-{}", last)),
            rssi: Some(rssi),
            service_uuids: Vec::new(),
        })
    }

    fn battery_service() -> GattService {
        GattService {
            uuid: uuid_from_short(0x180f),
            primary: true,
            characteristics: Vec::new(),
        }
    }

    #[test]
    fn test_scan_buttons_follow_scanning_flag() {
        let mut session = Session::new();
        assert!(session.can_start_scan());
        assert!(!session.can_stop_scan());
        assert_eq!(session.stop_scan(), None);

        assert_eq!(session.start_scan(), Some(BluetoothCommand::StartScan));
        assert!(session.is_scanning);
        assert_eq!(session.start_scan(), None);
        assert_eq!(session.report_device_count(), None);

        assert_eq!(session.stop_scan(), Some(BluetoothCommand::StopScan));
        assert!(!session.is_scanning);
    }

    #[test]
    fn test_start_scan_clears_previous_results() {
        let mut session = Session::new();
        session.start_scan();
        session.apply(found(1, -50));
        session.stop_scan();
        assert_eq!(session.report_device_count(), Some(1));

        session.start_scan();
        assert!(session.results.is_empty());
    }

    #[test]
    fn test_repeated_sightings_are_deduplicated() {
        let mut session = Session::new();
        session.start_scan();
        session.apply(found(1, -50));
        session.apply(found(2, -60));
        session.apply(found(1, -80));

        assert_eq!(session.results.len(), 2);
        assert_eq!(session.results.get(&addr(1)).unwrap().rssi, Some(-80));
    }

    #[test]
    fn test_results_ignored_when_not_scanning() {
        let mut session = Session::new();
        session.apply(found(1, -50));
        assert!(session.results.is_empty());
    }

    #[test]
    fn test_scan_failure_resets_flag() {
        let mut session = Session::new();
        session.start_scan();
        session.apply(AppEvent::ScanFailed("adapter busy".into()));
        assert!(!session.is_scanning);
        assert_eq!(
            session.status_message.as_ref().map(|m| m.severity),
            Some(MessageSeverity::Error)
        );
    }

    #[test]
    fn test_unavailable_adapter_blocks_scanning() {
        let mut session = Session::new();
        session.start_scan();
        session.apply(AppEvent::AdapterStatus(AdapterStatus::Unavailable {
            reason: "no adapter".into(),
        }));
        assert!(!session.is_scanning);
        assert!(!session.can_start_scan());
        assert_eq!(session.start_scan(), None);
    }

    #[test]
    fn test_connect_lifecycle() {
        let mut session = Session::new();
        assert_eq!(session.disconnect(), None);

        assert_eq!(session.connect(addr(7)), Some(BluetoothCommand::Connect(addr(7))));
        assert_eq!(session.connection_status, ConnectionStatus::Connecting);
        assert_eq!(session.connect(addr(8)), None);

        session.apply(AppEvent::ConnectionChanged {
            address: addr(7),
            status: ConnectionStatus::Connected,
        });
        session.apply(AppEvent::ServicesDiscovered {
            address: addr(7),
            services: vec![battery_service()],
        });
        assert_eq!(session.connection_status, ConnectionStatus::Connected);
        assert_eq!(session.services.len(), 1);

        assert_eq!(session.disconnect(), Some(BluetoothCommand::Disconnect));
        session.apply(AppEvent::ConnectionChanged {
            address: addr(7),
            status: ConnectionStatus::Disconnected,
        });
        assert!(session.services.is_empty());
    }

    #[test]
    fn test_events_for_previous_device_are_dropped() {
        let mut session = Session::new();
        session.connect(addr(1));
        session.apply(AppEvent::ConnectionChanged {
            address: addr(1),
            status: ConnectionStatus::Error,
        });

        session.connect(addr(2));
        session.apply(AppEvent::ConnectionChanged {
            address: addr(1),
            status: ConnectionStatus::Disconnected,
        });
        session.apply(AppEvent::ServicesDiscovered {
            address: addr(1),
            services: vec![battery_service()],
        });

        assert_eq!(session.active_device, Some(addr(2)));
        assert_eq!(session.connection_status, ConnectionStatus::Connecting);
        assert!(session.services.is_empty());
    }

    #[test]
    fn test_log_message_sets_status_line() {
        let mut session = Session::new();
        session.apply(AppEvent::LogMessage(StatusMessage::new(
            "Scanning for BLE devices...",
            MessageSeverity::Info,
        )));

        let message = session.status_message.as_ref().unwrap();
        assert_eq!(message.message, "Scanning for BLE devices...");
        assert_eq!(message.severity, MessageSeverity::Info);
    }

    #[test]
    fn test_connect_to_typed_address() {
        let mut session = Session::new();
        let command = session.connect_to_input(" 10:20:30:40:50:0a ");

        assert!(matches!(command, Some(BluetoothCommand::Connect(a)) if a == addr(0x0a)));
        assert_eq!(session.active_device, Some(addr(0x0a)));
        assert_eq!(session.connection_status, ConnectionStatus::Connecting);
    }

    #[test]
    fn test_malformed_typed_address_is_reported() {
        let mut session = Session::new();
        assert!(session.connect_to_input("10:20:30").is_none());

        assert_eq!(session.active_device, None);
        let message = session.status_message.as_ref().unwrap();
        assert_eq!(message.severity, MessageSeverity::Error);
        assert!(message.message.starts_with("Invalid address '10:20:30'"));
    }
}
