//! Configuration loaded from environment variables.
//!
//! Required: `DATABASE_URL`, `JWT_SECRET`.
//! Optional: `PORT` (default 8083), `NATS_URL`, `OVERLAY_URL`,
//! `DELIVERY_CHARGE` (default 10), `STORE_NAME` (invoice header).

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub nats_url: Option<String>,
    /// External image-overlay pipeline endpoint.
    pub overlay_url: Option<String>,
    /// Flat per-order delivery charge, in AED.
    pub delivery_charge: Decimal,
    pub store_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let jwt_secret = require("JWT_SECRET")?;

        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvVar("PORT", e.to_string()))?,
            Err(_) => 8083,
        };

        let delivery_charge = match std::env::var("DELIVERY_CHARGE") {
            Ok(v) => v
                .parse()
                .map_err(|e: rust_decimal::Error| ConfigError::InvalidEnvVar("DELIVERY_CHARGE", e.to_string()))?,
            Err(_) => Decimal::new(10, 0),
        };

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            nats_url: std::env::var("NATS_URL").ok(),
            overlay_url: std::env::var("OVERLAY_URL").ok(),
            delivery_charge,
            store_name: std::env::var("STORE_NAME").unwrap_or_else(|_| "PrintCraft".to_string()),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name))
}
