//! GATT Summaries
//!
//! Library-independent view of the services a connected peripheral exposes.

use uuid::Uuid;

/// Bluetooth base UUID `00000000-0000-1000-8000-00805f9b34fb`
pub const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805f9b34fb;

const SHORT_UUID_MASK: u128 = 0xffffffff_u128 << 96;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattCharacteristic {
    pub uuid: Uuid,
    /// Property names such as "read", "write" or "notify"
    pub properties: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattService {
    pub uuid: Uuid,
    pub primary: bool,
    pub characteristics: Vec<GattCharacteristic>,
}

impl GattService {
    pub fn label(&self) -> String {
        match known_service_name(&self.uuid) {
            Some(name) => format!("{} ({})", name, self.uuid),
            None => self.uuid.to_string(),
        }
    }
}

/// Expand a 16/32-bit SIG UUID onto the base UUID.
pub fn uuid_from_short(short: u32) -> Uuid {
    Uuid::from_u128(BLUETOOTH_BASE_UUID | ((short as u128) << 96))
}

/// The 16-bit form of `uuid`, if it lies on the base UUID.
pub fn short_uuid(uuid: &Uuid) -> Option<u16> {
    let value = uuid.as_u128();
    if value & !SHORT_UUID_MASK != BLUETOOTH_BASE_UUID {
        return None;
    }
    u16::try_from(value >> 96).ok()
}

pub fn known_service_name(uuid: &Uuid) -> Option<&'static str> {
    let name = match short_uuid(uuid)? {
        0x1800 => "Generic Access",
        0x1801 => "Generic Attribute",
        0x1802 => "Immediate Alert",
        0x1803 => "Link Loss",
        0x1804 => "Tx Power",
        0x1805 => "Current Time",
        0x180a => "Device Information",
        0x180d => "Heart Rate",
        0x180f => "Battery",
        0x1812 => "Human Interface Device",
        0x1816 => "Cycling Speed and Cadence",
        0x181a => "Environmental Sensing",
        0xfe59 => "Nordic DFU",
        _ => return None,
    };
    Some(name)
}

/// Render the service/characteristic tree logged after discovery.
pub fn gatt_table(services: &[GattService]) -> String {
    if services.is_empty() {
        return "No service and characteristic available, discovery returned nothing".to_string();
    }

    services
        .iter()
        .map(|service| {
            let characteristics = if service.characteristics.is_empty() {
                "|-- (none)".to_string()
            } else {
                service
                    .characteristics
                    .iter()
                    .map(|c| format!("|--{}", c.uuid))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            format!("Service {}\nCharacteristics:\n{}", service.uuid, characteristics)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
