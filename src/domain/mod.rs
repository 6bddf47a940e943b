pub mod address;
pub mod gatt;
pub mod models;
pub mod scan_results;
pub mod session;
pub mod settings;
