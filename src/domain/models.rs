use crate::domain::address::DeviceAddress;
use crate::domain::gatt::GattService;
use uuid::Uuid;

/// A single advertisement observation reported by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanObservation {
    pub address: DeviceAddress,
    pub name: Option<String>,
    /// Signal strength in dBm
    pub rssi: Option<i16>,
    pub service_uuids: Vec<Uuid>,
}

impl ScanObservation {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Weak,
    Unknown,
}

impl SignalQuality {
    pub fn from_rssi(rssi: Option<i16>) -> Self {
        match rssi {
            None => SignalQuality::Unknown,
            Some(r) if r >= -60 => SignalQuality::Excellent,
            Some(r) if r >= -70 => SignalQuality::Good,
            Some(r) if r >= -80 => SignalQuality::Fair,
            Some(_) => SignalQuality::Weak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterStatus {
    Unknown,
    Available { name: String },
    Unavailable { reason: String },
}

impl AdapterStatus {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AdapterStatus::Unavailable { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, severity: MessageSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

/// Events sent from the Bluetooth worker to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    AdapterStatus(AdapterStatus),
    DeviceFound(ScanObservation),
    ScanFailed(String),
    ConnectionChanged {
        address: DeviceAddress,
        status: ConnectionStatus,
    },
    ServicesDiscovered {
        address: DeviceAddress,
        services: Vec<GattService>,
    },
    LogMessage(StatusMessage),
}

/// Commands sent from the UI thread to the Bluetooth worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BluetoothCommand {
    StartScan,
    StopScan,
    Connect(DeviceAddress),
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scanner,
    Device,
    Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_quality_thresholds() {
        assert_eq!(SignalQuality::from_rssi(None), SignalQuality::Unknown);
        assert_eq!(SignalQuality::from_rssi(Some(-45)), SignalQuality::Excellent);
        assert_eq!(SignalQuality::from_rssi(Some(-60)), SignalQuality::Excellent);
        assert_eq!(SignalQuality::from_rssi(Some(-61)), SignalQuality::Good);
        assert_eq!(SignalQuality::from_rssi(Some(-80)), SignalQuality::Fair);
        assert_eq!(SignalQuality::from_rssi(Some(-95)), SignalQuality::Weak);
    }

    #[test]
    fn test_display_name_falls_back_to_unnamed() {
        let obs = ScanObservation {
            address: DeviceAddress::default(),
            name: None,
            rssi: None,
            service_uuids: Vec::new(),
        };
        assert_eq!(obs.display_name(), "Unnamed");
    }
}
