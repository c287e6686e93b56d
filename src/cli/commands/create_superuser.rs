use anyhow::Result;
use sea_orm::Database;
use tracing::{error, info};

use crate::identity;

pub async fn create_superuser(database_url: &str, email: &str, password: &str) -> Result<()> {
    let db = Database::connect(database_url).await?;

    match identity::create_superuser(&db, email, password).await {
        Ok(created) => {
            info!("Superuser {} created with ID {}", created.email, created.id);
            Ok(())
        }
        Err(e) => {
            error!("Failed to create superuser: {}", e);
            Err(e.into())
        }
    }
}
