//! Adapter discovery.

use crate::domain::models::AdapterStatus;
use crate::infrastructure::bluetooth::protocol::{BleError, Result};
use btleplug::api::{Central, Manager as _};
use btleplug::platform::{Adapter, Manager};
use tracing::info;

/// Pick the adapter at `index` from the host's adapter list.
pub async fn resolve_adapter(index: usize) -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    select_adapter(adapters, index)
}

fn select_adapter<T>(adapters: Vec<T>, index: usize) -> Result<T> {
    if adapters.is_empty() {
        return Err(BleError::NoAdapter);
    }
    let available = adapters.len();
    adapters
        .into_iter()
        .nth(index)
        .ok_or(BleError::AdapterIndexOutOfRange { index, available })
}

pub async fn describe(adapter: &Adapter) -> AdapterStatus {
    match adapter.adapter_info().await {
        Ok(name) => {
            info!("Using Bluetooth adapter: {}", name);
            AdapterStatus::Available { name }
        }
        Err(e) => AdapterStatus::Unavailable {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_adapter_by_index() {
        assert_eq!(select_adapter(vec!["hci0", "hci1"], 1).unwrap(), "hci1");
    }

    #[test]
    fn test_select_adapter_errors() {
        assert!(matches!(
            select_adapter(Vec::<&str>::new(), 0),
            Err(BleError::NoAdapter)
        ));
        assert!(matches!(
            select_adapter(vec!["hci0"], 2),
            Err(BleError::AdapterIndexOutOfRange {
                index: 2,
                available: 1
            })
        ));
    }
}
