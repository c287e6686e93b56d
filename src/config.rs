use crate::schemas::AppState;
use anyhow::Result;
use sea_orm::Database;

/// Initialize application state against an explicit database URL.
/// Defaults come from the CLI layer, which reads the environment and
/// `.env` before parsing.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState { db })
}
