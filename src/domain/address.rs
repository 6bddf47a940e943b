//! Bluetooth hardware addresses.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 48-bit Bluetooth device address, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DeviceAddress([u8; 6]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("expected 12 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

impl DeviceAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for DeviceAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressParseError;

    /// Accepts `AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff` or twelve bare hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<char> = s
            .trim()
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .collect();

        if digits.len() != 12 {
            return Err(AddressParseError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 6];
        for (i, pair) in digits.chunks(2).enumerate() {
            let hi = hex_value(pair[0])?;
            let lo = hex_value(pair[1])?;
            bytes[i] = (hi << 4) | lo;
        }

        Ok(Self(bytes))
    }
}

fn hex_value(c: char) -> Result<u8, AddressParseError> {
    c.to_digit(16)
        .map(|v| v as u8)
        .ok_or(AddressParseError::InvalidDigit(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_colon_separated_upper_hex() {
        let addr = DeviceAddress::new([0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]);
        assert_eq!(addr.to_string(), "0A:1B:2C:3D:4E:5F");
    }

    #[test]
    fn test_parse_accepts_common_forms() {
        let expected = DeviceAddress::new([0xaa, 0xbb, 0xcc, 0x01, 0x02, 0x03]);
        assert_eq!("AA:BB:CC:01:02:03".parse::<DeviceAddress>().unwrap(), expected);
        assert_eq!("aa-bb-cc-01-02-03".parse::<DeviceAddress>().unwrap(), expected);
        assert_eq!(" aabbcc010203 ".parse::<DeviceAddress>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "AA:BB:CC".parse::<DeviceAddress>(),
            Err(AddressParseError::InvalidLength(6))
        );
        assert_eq!(
            "AA:BB:CC:DD:EE:GG".parse::<DeviceAddress>(),
            Err(AddressParseError::InvalidDigit('G'))
        );
    }
}
