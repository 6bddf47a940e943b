//! BLE Scanner Module
//!
//! Subscribes to central events and forwards every advertisement as an
//! [`AppEvent::DeviceFound`].

use crate::domain::address::DeviceAddress;
use crate::domain::models::{AppEvent, MessageSeverity, ScanObservation, StatusMessage};
use crate::infrastructure::bluetooth::protocol::Result;
use btleplug::api::{Central, CentralEvent, Peripheral as _, PeripheralProperties, ScanFilter};
use btleplug::platform::{Adapter, PeripheralId};
use futures::StreamExt;
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct BleScanner {
    adapter: Option<Adapter>,
    task: Option<JoinHandle<()>>,
    event_sender: mpsc::UnboundedSender<AppEvent>,
}

impl BleScanner {
    pub fn new(event_sender: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            adapter: None,
            task: None,
            event_sender,
        }
    }

    /// Start scanning, optionally only for peripherals advertising `services`.
    pub async fn start(&mut self, adapter: &Adapter, services: Vec<Uuid>) -> Result<()> {
        self.stop().await?;

        info!("Starting BLE scan (service filter: {:?})", services);
        let mut events = adapter.events().await?;
        adapter.start_scan(ScanFilter { services }).await?;

        let _ = self.event_sender.send(AppEvent::LogMessage(StatusMessage::new(
            "Scanning for BLE devices...",
            MessageSeverity::Info,
        )));

        let central = adapter.clone();
        let sender = self.event_sender.clone();
        self.task = Some(tokio::spawn(async move {
            let mut seen = HashSet::new();
            while let Some(event) = events.next().await {
                let id = match event {
                    CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                    _ => continue,
                };
                match observe(&central, &id).await {
                    Ok(Some(observation)) => {
                        if seen.insert(observation.address) {
                            log_first_sighting(&observation);
                        }
                        debug!("{} RSSI: {:?}", observation.address, observation.rssi);
                        if sender.send(AppEvent::DeviceFound(observation)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("Could not read properties of {:?}: {}", id, e),
                }
            }
        }));
        self.adapter = Some(adapter.clone());

        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(adapter) = self.adapter.take() {
            info!("Stopping BLE scan...");
            adapter.stop_scan().await?;
            let _ = self.event_sender.send(AppEvent::LogMessage(StatusMessage::new(
                "Scan stopped.",
                MessageSeverity::Info,
            )));
        }
        Ok(())
    }
}

impl Drop for BleScanner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn observe(central: &Adapter, id: &PeripheralId) -> Result<Option<ScanObservation>> {
    let peripheral = central.peripheral(id).await?;
    Ok(peripheral.properties().await?.map(to_observation))
}

fn to_observation(properties: PeripheralProperties) -> ScanObservation {
    ScanObservation {
        address: DeviceAddress::from(properties.address.into_inner()),
        name: properties.local_name.filter(|n| !n.is_empty()),
        rssi: properties.rssi,
        service_uuids: properties.services,
    }
}

fn log_first_sighting(observation: &ScanObservation) {
    info!(
        "Found BLE device! Name: {}, address: {}",
        observation.display_name(),
        observation.address
    );
    if observation.service_uuids.is_empty() {
        info!("Service UUID count: no UUIDs");
    } else {
        info!("Service UUID count: {}", observation.service_uuids.len());
    }
}
