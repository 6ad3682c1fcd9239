use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{GpsFix, GpsReader};
use crate::utils::error::BridgeError;

/// The GPS ingest channel: one background reader feeding a single
/// last-write-wins fix slot.
///
/// The slot is empty until the first sentence parses; every later success
/// replaces it whole, so readers always see a consistent pair. The receive
/// timestamp is kept for the health endpoint only and never appears in the
/// `/api/gps` body.
#[derive(Clone)]
pub struct GpsService {
    current_fix: Arc<RwLock<Option<(GpsFix, DateTime<Utc>)>>>,
    is_running: Arc<RwLock<bool>>,
    port_name: String,
    baud_rate: u32,
    timeout_ms: u64,
}

impl GpsService {
    pub fn new(port_name: String, baud_rate: u32, timeout_ms: u64) -> Self {
        Self {
            current_fix: Arc::new(RwLock::new(None)),
            is_running: Arc::new(RwLock::new(false)),
            port_name,
            baud_rate,
            timeout_ms,
        }
    }

    /// Open the inbound port and start streaming in the background.
    ///
    /// A second call while the ingest is live is a no-op. A failed open or a
    /// fatal read error logs the cause and leaves the channel closed: a
    /// dropped connection stays down until the process restarts.
    pub async fn start(&self) -> Result<(), BridgeError> {
        let mut running = self.is_running.write().await;
        if *running {
            info!("🧭 GPS ingest already running");
            return Ok(());
        }
        *running = true;
        drop(running);

        let port_name = self.port_name.clone();
        let baud_rate = self.baud_rate;
        let timeout_ms = self.timeout_ms;
        let current_fix = self.current_fix.clone();
        let is_running = self.is_running.clone();

        tokio::task::spawn_blocking(move || {
            info!("🧭 Starting GPS ingest on {} at {} baud", port_name, baud_rate);

            match GpsReader::new(&port_name, baud_rate, timeout_ms) {
                Ok(mut reader) => {
                    let result = reader.run(|fix| {
                        debug!("📍 Fix acquired: {}", fix);
                        *current_fix.blocking_write() = Some((fix, Utc::now()));
                        *is_running.blocking_read()
                    });

                    if let Err(e) = result {
                        error!("❌ GPS ingest stopped: {}", e);
                    }
                }
                Err(e) => {
                    error!("❌ Failed to open GPS port: {}", e);
                }
            }

            *is_running.blocking_write() = false;
            info!("🧭 GPS ingest stopped");
        });

        Ok(())
    }

    /// Flag the ingest loop to end at the next delivered fix.
    pub async fn stop(&self) -> Result<(), BridgeError> {
        let mut running = self.is_running.write().await;
        *running = false;
        info!("🧭 GPS ingest stopping...");
        Ok(())
    }

    /// Snapshot of the most recent fix. No side effects, never fails.
    pub async fn latest_fix(&self) -> Option<GpsFix> {
        self.current_fix.read().await.map(|(fix, _)| fix)
    }

    /// When the current fix arrived, if one has.
    pub async fn last_fix_at(&self) -> Option<DateTime<Utc>> {
        self.current_fix.read().await.map(|(_, at)| at)
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    pub async fn status(&self) -> String {
        let running = self.is_running().await;
        let fix = self.latest_fix().await;

        match (running, fix) {
            (true, Some(fix)) => format!("🧭 GPS active - position {}", fix),
            (true, None) => "🧭 GPS active - waiting for fix...".to_string(),
            (false, _) => "🧭 GPS inactive".to_string(),
        }
    }

    /// Ingest-side store, split out so the overwrite semantics are testable
    /// without a serial port.
    pub(crate) async fn store_fix(&self, fix: GpsFix) {
        *self.current_fix.write().await = Some((fix, Utc::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GpsService {
        GpsService::new("/dev/null".to_string(), 9600, 100)
    }

    #[tokio::test]
    async fn test_fix_slot_starts_empty() {
        let gps = service();
        assert_eq!(gps.latest_fix().await, None);
        assert!(gps.last_fix_at().await.is_none());
    }

    #[tokio::test]
    async fn test_fix_slot_overwrites_last_write_wins() {
        let gps = service();

        gps.store_fix(GpsFix { latitude: 36.8, longitude: 10.2 }).await;
        assert_eq!(
            gps.latest_fix().await,
            Some(GpsFix { latitude: 36.8, longitude: 10.2 })
        );

        gps.store_fix(GpsFix { latitude: 36.9, longitude: 10.3 }).await;
        assert_eq!(
            gps.latest_fix().await,
            Some(GpsFix { latitude: 36.9, longitude: 10.3 })
        );
    }

    #[tokio::test]
    async fn test_status_reflects_lifecycle() {
        let gps = service();
        assert_eq!(gps.status().await, "🧭 GPS inactive");
    }
}
