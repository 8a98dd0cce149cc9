use std::{str::FromStr, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::utilities::{config::Config, errors::AppError};

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let options = connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to database: {e}");
                AppError::DatabaseConnectionError
            })?;

        info!("Database connected");

        Ok(Database { pool })
    }

    /// Builds a pool that only connects on first use.
    pub fn lazy(config: &Config) -> Result<Self, AppError> {
        let options = connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy_with(options);

        Ok(Database { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }
}

fn connect_options(config: &Config) -> Result<PgConnectOptions, AppError> {
    let options = PgConnectOptions::from_str(&config.database_url)?
        .ssl_mode(config.pg_ssl_mode);
    Ok(options)
}
