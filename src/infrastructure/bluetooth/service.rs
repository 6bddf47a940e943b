//! Bluetooth Service Module
//!
//! Coordinates the adapter, the scanner and the single active connection.

use crate::domain::address::DeviceAddress;
use crate::domain::models::{
    AdapterStatus, AppEvent, ConnectionStatus, MessageSeverity, StatusMessage,
};
use crate::domain::settings::{Settings, SettingsService};
use crate::infrastructure::bluetooth::{
    adapter,
    connection::{BleConnection, ConnectionConfig},
    protocol::{self, BleError},
    scanner::BleScanner,
};
use anyhow::Result;
use btleplug::api::{BDAddr, Central, CentralEvent, Peripheral as _};
use btleplug::platform::{Adapter, Peripheral};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

struct ActiveDevice {
    address: DeviceAddress,
    peripheral: Peripheral,
    watcher: JoinHandle<()>,
}

pub struct BluetoothService {
    adapter: Option<Adapter>,
    scanner: BleScanner,
    active: Option<ActiveDevice>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
    settings: Arc<Mutex<SettingsService>>,
}

impl BluetoothService {
    pub fn new(
        event_sender: mpsc::UnboundedSender<AppEvent>,
        settings: Arc<Mutex<SettingsService>>,
    ) -> Self {
        Self {
            adapter: None,
            scanner: BleScanner::new(event_sender.clone()),
            active: None,
            event_sender,
            settings,
        }
    }

    /// Resolve the adapter and report whether Bluetooth is usable.
    pub async fn probe_adapter(&mut self) {
        let status = match self.adapter().await {
            Ok(adapter) => adapter::describe(&adapter).await,
            Err(e) => AdapterStatus::Unavailable {
                reason: e.to_string(),
            },
        };
        if let AdapterStatus::Unavailable { reason } = &status {
            warn!("Bluetooth unavailable: {}", reason);
            self.send_log(
                &format!("Bluetooth unavailable: {}. Enable Bluetooth and restart.", reason),
                MessageSeverity::Warning,
            );
        }
        let _ = self.event_sender.send(AppEvent::AdapterStatus(status));
    }

    async fn adapter(&mut self) -> Result<Adapter> {
        if let Some(adapter) = &self.adapter {
            return Ok(adapter.clone());
        }
        let index = self.with_settings(|s| s.adapter_index)?;
        let adapter = adapter::resolve_adapter(index).await?;
        self.adapter = Some(adapter.clone());
        Ok(adapter)
    }

    pub async fn start_scan(&mut self) -> Result<()> {
        let filter = self.with_settings(|s| s.scan_service_filter.clone())?;
        let services = protocol::parse_service_filter(&filter)?;
        let adapter = self.adapter().await?;
        self.scanner.start(&adapter, services).await?;
        Ok(())
    }

    pub async fn stop_scan(&mut self) -> Result<()> {
        self.scanner.stop().await?;
        Ok(())
    }

    /// Connect to a previously scanned device. Any other connection is dropped first.
    pub async fn connect(&mut self, address: DeviceAddress) -> Result<()> {
        match handover(self.active.as_ref().map(|active| active.address), address) {
            Handover::Fresh => {}
            Handover::Replace(previous) => {
                info!("Dropping {} before connecting to {}", previous, address);
                self.disconnect().await;
            }
            // Reconnecting to the same device keeps the link but not its watcher
            Handover::Reuse => {
                if let Some(active) = self.active.take() {
                    active.watcher.abort();
                }
            }
        }

        let config = self.with_settings(|s| ConnectionConfig::from(s))?;
        let adapter = self.adapter().await?;
        let peripheral = find_peripheral(&adapter, address).await?;

        let connection = BleConnection::new(self.event_sender.clone(), config);
        let services = connection.connect(&peripheral).await?;

        let watcher = match self.watch_disconnect(&adapter, &peripheral, address).await {
            Ok(watcher) => watcher,
            Err(e) => {
                if let Err(close_err) = peripheral.disconnect().await {
                    warn!("Failed to close link after error: {}", close_err);
                }
                return Err(e);
            }
        };
        self.active = Some(ActiveDevice {
            address,
            peripheral,
            watcher,
        });

        let _ = self.event_sender.send(AppEvent::ConnectionChanged {
            address,
            status: ConnectionStatus::Connected,
        });
        let _ = self
            .event_sender
            .send(AppEvent::ServicesDiscovered { address, services });

        Ok(())
    }

    pub async fn disconnect(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.watcher.abort();

        if let Err(e) = active.peripheral.disconnect().await {
            warn!("Disconnect from {} failed: {}", active.address, e);
        }

        info!("Successfully disconnected from {}", active.address);
        self.send_log(
            &format!("Disconnected from {}", active.address),
            MessageSeverity::Info,
        );
        let _ = self.event_sender.send(AppEvent::ConnectionChanged {
            address: active.address,
            status: ConnectionStatus::Disconnected,
        });
    }

    /// Report link loss initiated by the peripheral or the host stack.
    async fn watch_disconnect(
        &self,
        adapter: &Adapter,
        peripheral: &Peripheral,
        address: DeviceAddress,
    ) -> Result<JoinHandle<()>> {
        let mut events = adapter.events().await?;
        let id = peripheral.id();
        let sender = self.event_sender.clone();

        Ok(tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let gone = match &event {
                    CentralEvent::DeviceDisconnected(gone) => Some(gone),
                    _ => None,
                };
                if let Some(lost) = link_lost(gone, &id, address) {
                    warn!("{} disconnected", address);
                    let _ = sender.send(lost);
                    break;
                }
            }
        }))
    }

    fn with_settings<T>(&self, f: impl FnOnce(&Settings) -> T) -> Result<T> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| anyhow::anyhow!("Lock error"))?;
        Ok(f(settings.get()))
    }

    fn send_log(&self, message: &str, severity: MessageSeverity) {
        let _ = self
            .event_sender
            .send(AppEvent::LogMessage(StatusMessage::new(message, severity)));
    }
}

async fn find_peripheral(adapter: &Adapter, address: DeviceAddress) -> Result<Peripheral> {
    let target = BDAddr::from(address.bytes());
    adapter
        .peripherals()
        .await?
        .into_iter()
        .find(|p| p.address() == target)
        .ok_or_else(|| anyhow::Error::from(BleError::DeviceNotFound(address)))
}

/// What happens to the current link when a connection to `target` is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handover {
    /// Nothing is connected
    Fresh,
    /// `target` is already the active device
    Reuse,
    /// Another device is active and must be disconnected first
    Replace(DeviceAddress),
}

fn handover(active: Option<DeviceAddress>, target: DeviceAddress) -> Handover {
    match active {
        None => Handover::Fresh,
        Some(current) if current == target => Handover::Reuse,
        Some(current) => Handover::Replace(current),
    }
}

/// Map a disconnected peripheral id to the event for the watched device.
fn link_lost<I: PartialEq>(
    disconnected: Option<&I>,
    watched: &I,
    address: DeviceAddress,
) -> Option<AppEvent> {
    (disconnected? == watched).then_some(AppEvent::ConnectionChanged {
        address,
        status: ConnectionStatus::Disconnected,
    })
}
