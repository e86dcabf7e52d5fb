mod error;
mod models;
mod repositories;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

pub use error::DatabaseError;
pub use models::*;
pub use repositories::BookingRepository;

/// Initialize the database connection pool and run pending migrations.
pub async fn init_pool(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections.unwrap_or(5))
        .min_connections(config.database.min_connections.unwrap_or(1))
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
