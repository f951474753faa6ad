// core/src/config.rs

use crate::error::{MarketError, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

/// Connection settings for the backing store, loaded from the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  pub database_url: String,
  pub max_connections: u32,
}

impl StoreConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| MarketError::Config(format!("missing environment variable '{}': {}", var_name, e)))
    };

    let database_url = get_env("DATABASE_URL")?;
    let max_connections = get_env("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| MarketError::Config(format!("invalid DB_MAX_CONNECTIONS: {}", e)))?;

    tracing::info!("store configuration loaded");

    Ok(Self {
      database_url,
      max_connections,
    })
  }

  pub async fn connect(&self) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
      .max_connections(self.max_connections)
      .connect(&self.database_url)
      .await?;
    tracing::info!("connected to the database");
    Ok(pool)
  }
}
