//! Periodic removal of expired and revoked admin sessions.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use crave_db::repositories::AdminSessionRepo;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the session sweep loop until `cancel` is triggered.
///
/// The first sweep happens immediately on start.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Admin session sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Admin session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match AdminSessionRepo::cleanup_expired(&pool).await {
                    Ok(0) => tracing::debug!("Session sweep: nothing to remove"),
                    Ok(deleted) => tracing::info!(deleted, "Session sweep: removed stale sessions"),
                    Err(e) => tracing::error!(error = %e, "Session sweep failed"),
                }
            }
        }
    }
}
