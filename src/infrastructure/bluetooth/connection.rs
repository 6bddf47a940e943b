//! BLE Connection Module
//!
//! Connects to a peripheral and discovers its GATT services.

use crate::domain::gatt::{gatt_table, GattService};
use crate::domain::models::{AppEvent, MessageSeverity, StatusMessage};
use crate::domain::settings::Settings;
use crate::infrastructure::bluetooth::protocol::{self, BleError, Result};
use btleplug::api::Peripheral as _;
use btleplug::platform::Peripheral;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Configuration for connection behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Attempts before giving up
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub discover_timeout_ms: u64,
}

impl From<&Settings> for ConnectionConfig {
    fn from(s: &Settings) -> Self {
        Self {
            max_retries: s.connect_max_retries.max(1),
            retry_delay_ms: s.connect_retry_delay_ms,
            connect_timeout_ms: s.connect_timeout_ms,
            discover_timeout_ms: s.discover_timeout_ms,
        }
    }
}

pub struct BleConnection {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    config: ConnectionConfig,
}

impl BleConnection {
    pub fn new(event_sender: mpsc::UnboundedSender<AppEvent>, config: ConnectionConfig) -> Self {
        Self {
            event_sender,
            config,
        }
    }

    /// Connect to `peripheral` and return its discovered services.
    pub async fn connect(&self, peripheral: &Peripheral) -> Result<Vec<GattService>> {
        let address = peripheral.address();
        info!("Connecting to {}", address);
        self.send_log(&format!("Connecting to {}...", address), MessageSeverity::Info);

        self.connect_with_retries(peripheral).await?;
        info!("Successfully connected to {}", address);

        let discovered = self.discover_services(peripheral).await;
        let services = close_on_error(discovered, peripheral.disconnect()).await?;
        info!("Discovered {} services for {}", services.len(), address);
        info!("\n{}", gatt_table(&services));

        self.send_log(
            &format!("Discovered {} services", services.len()),
            MessageSeverity::Success,
        );
        Ok(services)
    }

    async fn connect_with_retries(&self, peripheral: &Peripheral) -> Result<()> {
        let mut last_error = None;

        for attempt in 1..=self.config.max_retries {
            match with_timeout(
                "Connect",
                self.config.connect_timeout_ms,
                peripheral.connect(),
            )
            .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        "Connection attempt {}/{} failed: {}",
                        attempt, self.config.max_retries, e
                    );
                    // Tear the half-open link down before the next attempt
                    if let Err(close_err) = peripheral.disconnect().await {
                        warn!("Failed to close link after error: {}", close_err);
                    }
                    last_error = Some(e);

                    if attempt < self.config.max_retries {
                        self.send_log(
                            &format!("Connection attempt {} failed, retrying...", attempt),
                            MessageSeverity::Warning,
                        );
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms))
                            .await;
                    }
                }
            }
        }

        error!(
            "Failed to connect after {} attempts",
            self.config.max_retries
        );
        Err(last_error.unwrap_or(BleError::Timeout {
            operation: "Connect",
            timeout_ms: self.config.connect_timeout_ms,
        }))
    }

    async fn discover_services(&self, peripheral: &Peripheral) -> Result<Vec<GattService>> {
        with_timeout(
            "Service discovery",
            self.config.discover_timeout_ms,
            peripheral.discover_services(),
        )
        .await?;

        Ok(peripheral
            .services()
            .iter()
            .map(protocol::to_gatt_service)
            .collect())
    }

    fn send_log(&self, message: &str, severity: MessageSeverity) {
        let _ = self
            .event_sender
            .send(AppEvent::LogMessage(StatusMessage::new(message, severity)));
    }
}

async fn with_timeout<F>(operation: &'static str, timeout_ms: u64, fut: F) -> Result<()>
where
    F: Future<Output = btleplug::Result<()>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(BleError::Timeout {
            operation,
            timeout_ms,
        }),
    }
}

/// Run `close` when `result` is an error, keeping the original error.
async fn close_on_error<T, C>(result: Result<T>, close: C) -> Result<T>
where
    C: Future<Output = btleplug::Result<()>>,
{
    if result.is_err() {
        if let Err(close_err) = close.await {
            warn!("Failed to close link after error: {}", close_err);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_config_never_allows_zero_attempts() {
        let settings = Settings {
            connect_max_retries: 0,
            ..Default::default()
        };
        assert_eq!(ConnectionConfig::from(&settings).max_retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_reports_operation() {
        let pending = std::future::pending::<btleplug::Result<()>>();
        let err = with_timeout("Connect", 250, pending).await.unwrap_err();
        assert_eq!(err.to_string(), "Connect timed out after 250ms");
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through_errors() {
        let failing = async { Err::<(), _>(btleplug::Error::DeviceNotFound) };
        let err = with_timeout("Connect", 1000, failing).await.unwrap_err();
        assert!(matches!(err, BleError::Btleplug(btleplug::Error::DeviceNotFound)));
    }

    #[tokio::test]
    async fn test_failed_discovery_closes_link() {
        let closed = AtomicUsize::new(0);
        let close = async {
            closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };
        let failed: Result<Vec<GattService>> = Err(BleError::Timeout {
            operation: "Service discovery",
            timeout_ms: 10,
        });

        let err = close_on_error(failed, close).await.unwrap_err();
        assert!(matches!(err, BleError::Timeout { operation: "Service discovery", .. }));
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_error_keeps_discovery_error() {
        let close = async { Err(btleplug::Error::NotConnected) };
        let failed: Result<()> = Err(BleError::InvalidUuid("x".to_string()));

        let err = close_on_error(failed, close).await.unwrap_err();
        assert!(matches!(err, BleError::InvalidUuid(_)));
    }

    #[tokio::test]
    async fn test_successful_discovery_keeps_link() {
        let closed = AtomicUsize::new(0);
        let close = async {
            closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        let services = close_on_error(Ok(Vec::<GattService>::new()), close).await.unwrap();
        assert!(services.is_empty());
        assert_eq!(closed.load(Ordering::SeqCst), 0);
    }
}
