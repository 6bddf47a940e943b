//! Bluetooth Module
//!
//! BLE scanning and GATT access through the host stack (btleplug).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               BluetoothService               │
//! │   (driven by BluetoothCommand from the UI)   │
//! └───────┬───────────────┬───────────────┬──────┘
//!         │               │               │
//!         ▼               ▼               ▼
//!   ┌──────────┐   ┌─────────────┐  ┌────────────┐
//!   │ Adapter  │   │   Scanner   │  │ Connection │
//!   │ - lookup │   │ - advert    │  │ - connect  │
//!   │ - status │   │   events    │  │ - services │
//!   └──────────┘   └─────────────┘  └────────────┘
//! ```
//!
//! - [`protocol`] - errors, UUID parsing, GATT type conversion
//! - [`adapter`] - adapter selection
//! - [`scanner`] - advertisement discovery
//! - [`connection`] - connect with retries and service discovery
//! - [`service`] - coordinator

pub mod adapter;
pub mod connection;
pub mod protocol;
pub mod scanner;
pub mod service;

pub use service::BluetoothService;
