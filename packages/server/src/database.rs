use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connect to the configured database and create any missing tables.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);
    if let Some(secs) = config.idle_timeout_secs {
        opt.idle_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.max_lifetime_secs {
        opt.max_lifetime(Duration::from_secs(secs));
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("school_server::entity::*")
        .sync(&db)
        .await?;

    info!(backend = ?db.get_database_backend(), "Database ready");
    Ok(db)
}
