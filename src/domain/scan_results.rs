//! Scan Result List
//!
//! Devices seen during the current scan, keyed by hardware address. Each
//! address appears at most once; a fresh observation replaces the stored one
//! in place so rows keep the order in which devices were first seen.

use crate::domain::address::DeviceAddress;
use crate::domain::models::ScanObservation;

/// Outcome of [`ScanResults::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted(usize),
    Updated(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    entries: Vec<ScanObservation>,
}

impl ScanResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn upsert(&mut self, observation: ScanObservation) -> Upsert {
        match self
            .entries
            .iter()
            .position(|e| e.address == observation.address)
        {
            Some(index) => {
                self.entries[index] = observation;
                Upsert::Updated(index)
            }
            None => {
                self.entries.push(observation);
                Upsert::Inserted(self.entries.len() - 1)
            }
        }
    }

    pub fn get(&self, address: &DeviceAddress) -> Option<&ScanObservation> {
        self.entries.iter().find(|e| &e.address == address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanObservation> {
        self.entries.iter()
    }

    /// Entries that advertised a local name
    pub fn named(&self) -> impl Iterator<Item = &ScanObservation> {
        self.entries.iter().filter(|e| e.name.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(last: u8, name: Option<&str>, rssi: i16) -> ScanObservation {
        ScanObservation {
            address: DeviceAddress::new([0xde, 0xad, 0xbe, 0xef, 0x00, last]),
            name: name.map(str::to_string),
            rssi: Some(rssi),
            service_uuids: Vec::new(),
        }
    }

    #[test]
    fn test_new_addresses_are_appended() {
        let mut results = ScanResults::new();
        assert_eq!(results.upsert(obs(1, Some("a"), -50)), Upsert::Inserted(0));
        assert_eq!(results.upsert(obs(2, Some("b"), -60)), Upsert::Inserted(1));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_known_address_is_replaced_in_place() {
        let mut results = ScanResults::new();
        results.upsert(obs(1, Some("first"), -50));
        results.upsert(obs(2, Some("second"), -60));

        assert_eq!(results.upsert(obs(1, Some("renamed"), -72)), Upsert::Updated(0));
        assert_eq!(results.len(), 2);

        let first = results.iter().next().unwrap();
        assert_eq!(first.name.as_deref(), Some("renamed"));
        assert_eq!(first.rssi, Some(-72));
    }

    #[test]
    fn test_replacement_drops_stale_name() {
        let mut results = ScanResults::new();
        results.upsert(obs(1, Some("beacon"), -50));
        results.upsert(obs(1, None, -55));

        let entry = results.get(&DeviceAddress::new([0xde, 0xad, 0xbe, 0xef, 0x00, 1]));
        assert_eq!(entry.and_then(|e| e.name.clone()), None);
        assert_eq!(results.named().count(), 0);
    }

    #[test]
    fn test_repeated_sightings_never_grow_the_list() {
        let mut results = ScanResults::new();
        for round in 0..20 {
            for last in 0..5u8 {
                results.upsert(obs(last, Some("dev"), -40 - round));
            }
        }
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_clear_empties_list() {
        let mut results = ScanResults::new();
        results.upsert(obs(1, None, -50));
        results.clear();
        assert!(results.is_empty());
    }
}
