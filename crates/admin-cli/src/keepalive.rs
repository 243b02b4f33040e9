//! Periodic backend ping so a sleeping host stays warm

use std::time::Duration;

use rental_client::ApiClient;
use tracing::{info, warn};

/// Ping forever; failures are logged and the loop keeps going
pub async fn run(client: ApiClient, interval: Duration, timeout: Duration) {
    info!(
        "Keep-alive started: every {:?}, timeout {:?}",
        interval, timeout
    );
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        ping_once(&client, timeout).await;
    }
}

pub async fn ping_once(client: &ApiClient, timeout: Duration) -> bool {
    match client.ping(timeout).await {
        Ok(elapsed) => {
            info!("Keep-alive ping ok in {:?}", elapsed);
            true
        }
        Err(err) => {
            warn!("Keep-alive ping failed: {}", err);
            false
        }
    }
}
