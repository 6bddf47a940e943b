//! BLE Protocol Helpers
//!
//! Error type, UUID parsing for user settings, and conversion from btleplug
//! GATT types into the domain summaries.

use crate::domain::address::DeviceAddress;
use crate::domain::gatt::{uuid_from_short, GattCharacteristic, GattService};
use btleplug::api::{CharPropFlags, Characteristic, Service};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BleError {
    #[error("No Bluetooth adapter found")]
    NoAdapter,

    #[error("Bluetooth adapter #{index} not present ({available} available)")]
    AdapterIndexOutOfRange { index: usize, available: usize },

    #[error("Device {0} has not been seen by the scanner")]
    DeviceNotFound(DeviceAddress),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Invalid UUID '{0}'")]
    InvalidUuid(String),

    #[error(transparent)]
    Btleplug(#[from] btleplug::Error),
}

pub type Result<T> = std::result::Result<T, BleError>;

/// Parse a UUID from settings.
///
/// Accepts the full 128-bit form or a 4/8 hex-digit SIG short form,
/// optionally prefixed with `0x`.
pub fn parse_uuid(uuid_str: &str) -> Result<Uuid> {
    let trimmed = uuid_str.trim();
    let short = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if matches!(short.len(), 4 | 8) && short.chars().all(|c| c.is_ascii_hexdigit()) {
        return u32::from_str_radix(short, 16)
            .map(uuid_from_short)
            .map_err(|_| BleError::InvalidUuid(uuid_str.to_string()));
    }

    Uuid::parse_str(trimmed).map_err(|_| BleError::InvalidUuid(uuid_str.to_string()))
}

/// Parse every entry of a service filter, failing on the first bad one.
pub fn parse_service_filter(entries: &[String]) -> Result<Vec<Uuid>> {
    entries
        .iter()
        .filter(|e| !e.trim().is_empty())
        .map(|e| parse_uuid(e))
        .collect()
}

pub fn property_names(flags: CharPropFlags) -> Vec<&'static str> {
    const NAMES: [(CharPropFlags, &str); 8] = [
        (CharPropFlags::BROADCAST, "broadcast"),
        (CharPropFlags::READ, "read"),
        (CharPropFlags::WRITE_WITHOUT_RESPONSE, "write-without-response"),
        (CharPropFlags::WRITE, "write"),
        (CharPropFlags::NOTIFY, "notify"),
        (CharPropFlags::INDICATE, "indicate"),
        (CharPropFlags::AUTHENTICATED_SIGNED_WRITES, "signed-write"),
        (CharPropFlags::EXTENDED_PROPERTIES, "extended"),
    ];

    NAMES
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect()
}

fn to_characteristic(characteristic: &Characteristic) -> GattCharacteristic {
    GattCharacteristic {
        uuid: characteristic.uuid,
        properties: property_names(characteristic.properties),
    }
}

pub fn to_gatt_service(service: &Service) -> GattService {
    GattService {
        uuid: service.uuid,
        primary: service.primary,
        characteristics: service.characteristics.iter().map(to_characteristic).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_uuid_full_and_short() {
        let full = parse_uuid("6E400001-B5A3-F393-E0A9-E50E24DCCA9E").unwrap();
        assert_eq!(full.to_string(), "6e400001-b5a3-f393-e0a9-e50e24dcca9e");

        let short = parse_uuid("180d").unwrap();
        assert_eq!(short.to_string(), "0000180d-0000-1000-8000-00805f9b34fb");
        assert_eq!(parse_uuid("0x180D").unwrap(), short);
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(matches!(parse_uuid("zzzz"), Err(BleError::InvalidUuid(_))));
        assert!(matches!(parse_uuid("1234-5678"), Err(BleError::InvalidUuid(_))));
    }

    #[test]
    fn test_parse_uuid_rejects_signed_short_form() {
        assert!(matches!(parse_uuid("+180"), Err(BleError::InvalidUuid(_))));
        assert!(matches!(parse_uuid("0x+180"), Err(BleError::InvalidUuid(_))));
        assert!(matches!(parse_uuid("+180000f"), Err(BleError::InvalidUuid(_))));
    }

    #[test]
    fn test_service_filter_skips_blank_entries() {
        let entries = vec!["180f".to_string(), "  ".to_string()];
        assert_eq!(parse_service_filter(&entries).unwrap().len(), 1);
        assert!(parse_service_filter(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_property_names() {
        let flags = CharPropFlags::READ | CharPropFlags::NOTIFY;
        assert_eq!(property_names(flags), vec!["read", "notify"]);
        assert!(property_names(CharPropFlags::empty()).is_empty());
    }

    #[test]
    fn test_service_conversion() {
        let service_uuid = uuid_from_short(0x180f);
        let level = Characteristic {
            uuid: uuid_from_short(0x2a19),
            service_uuid,
            properties: CharPropFlags::READ | CharPropFlags::NOTIFY,
            descriptors: BTreeSet::new(),
        };
        let service = Service {
            uuid: service_uuid,
            primary: true,
            characteristics: BTreeSet::from([level]),
        };

        let gatt = to_gatt_service(&service);
        assert_eq!(gatt.uuid, service_uuid);
        assert!(gatt.primary);
        assert_eq!(gatt.characteristics.len(), 1);
        assert_eq!(gatt.characteristics[0].properties, vec!["read", "notify"]);
    }
}
