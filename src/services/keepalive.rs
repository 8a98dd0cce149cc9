use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::{sync::RwLock, task::JoinHandle, time::interval};
use tracing::{debug, warn};

use crate::utilities::config::Config;

#[derive(Serialize, Clone, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveStatus {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub last_ping_at: Option<DateTime<Utc>>,
    pub last_latency_ms: Option<u128>,
    pub last_error: Option<String>,
    pub successful_pings: u64,
    pub failed_pings: u64,
}

/// Periodic database ping that keeps a hosted database from idling out.
///
/// The loop never overlaps itself: each tick awaits the previous ping.
#[derive(Clone)]
pub struct KeepAlive {
    enabled: Arc<AtomicBool>,
    period: Duration,
    status: Arc<RwLock<KeepAliveStatus>>,
}

impl KeepAlive {
    pub fn new(config: &Config) -> Self {
        KeepAlive::with_period(
            Duration::from_secs(config.keepalive_interval_seconds.max(1)),
            config.keepalive_enabled,
        )
    }

    pub fn with_period(period: Duration, enabled: bool) -> Self {
        KeepAlive {
            enabled: Arc::new(AtomicBool::new(enabled)),
            period,
            status: Arc::new(RwLock::new(KeepAliveStatus::default())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub async fn status(&self) -> KeepAliveStatus {
        let mut status = self.status.read().await.clone();
        status.enabled = self.is_enabled();
        status.interval_seconds = self.period.as_secs();
        status
    }

    pub fn spawn(&self, pool: PgPool) -> JoinHandle<()> {
        let keepalive = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(keepalive.period);

            loop {
                ticker.tick().await;

                if !keepalive.is_enabled() {
                    continue;
                }

                keepalive.ping(&pool).await;
            }
        })
    }

    pub async fn ping(&self, pool: &PgPool) {
        let started = Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;
        let latency = started.elapsed();

        self.record(result.map(|_| latency).map_err(|e| e.to_string()))
            .await;
    }

    async fn record(&self, outcome: Result<Duration, String>) {
        let mut status = self.status.write().await;
        status.last_ping_at = Some(Utc::now());

        match outcome {
            Ok(latency) => {
                debug!("keep-alive ping took {}ms", latency.as_millis());
                status.last_latency_ms = Some(latency.as_millis());
                status.last_error = None;
                status.successful_pings += 1;
            }
            Err(e) => {
                warn!("keep-alive ping failed: {e}");
                status.last_error = Some(e);
                status.failed_pings += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggling_is_reflected_in_status() {
        let keepalive = KeepAlive::with_period(Duration::from_secs(30), false);
        assert!(!keepalive.status().await.enabled);

        keepalive.set_enabled(true);
        let status = keepalive.status().await;
        assert!(status.enabled);
        assert_eq!(status.interval_seconds, 30);
    }

    #[tokio::test]
    async fn records_successes_and_failures() {
        let keepalive = KeepAlive::with_period(Duration::from_secs(30), true);

        keepalive.record(Ok(Duration::from_millis(12))).await;
        let status = keepalive.status().await;
        assert_eq!(status.successful_pings, 1);
        assert_eq!(status.last_latency_ms, Some(12));
        assert!(status.last_ping_at.is_some());

        keepalive.record(Err("connection refused".to_string())).await;
        let status = keepalive.status().await;
        assert_eq!(status.failed_pings, 1);
        assert_eq!(status.last_error.as_deref(), Some("connection refused"));
        // the last good latency stays visible
        assert_eq!(status.last_latency_ms, Some(12));
    }
}
