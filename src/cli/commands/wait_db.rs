use anyhow::{Result, bail};
use sea_orm::Database;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Retry connecting until the database answers a ping.
/// `max_attempts == 0` retries forever.
pub async fn wait_for_database(database_url: &str, max_attempts: u32) -> Result<()> {
    info!("Waiting for database...");

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match Database::connect(database_url).await {
            Ok(db) if db.ping().await.is_ok() => {
                info!("Database available after {} attempt(s)", attempt);
                return Ok(());
            }
            Ok(_) => {
                warn!("Database connected but not answering, waiting 1 second...");
            }
            Err(e) => {
                warn!("Database unavailable ({}), waiting 1 second...", e);
            }
        }

        if max_attempts != 0 && attempt >= max_attempts {
            bail!("database not available after {} attempts", attempt);
        }
        sleep(RETRY_INTERVAL).await;
    }
}
