// src/config.rs
use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::{env, net::SocketAddr, str::FromStr};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TOTAL_HOURS: Decimal = dec!(386.00);

/// Account created (or refreshed) at startup.
#[derive(Debug, Clone)]
pub struct SeedAccount {
    pub student_id: String,
    pub name: String,
    pub password: String,
    pub total_hours_required: Decimal,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: SocketAddr,
    pub seed: Option<SeedAccount>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let raw_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = raw_addr
            .parse()
            .map_err(|e| AppError::InvalidInput(format!("SERVER_ADDR '{}': {}", raw_addr, e)))?;

        // Seeding is only enabled when a student id is configured
        let seed = match env::var("SEED_STUDENT_ID") {
            Ok(student_id) if !student_id.trim().is_empty() => {
                let total_hours_required = match env::var("SEED_TOTAL_HOURS") {
                    Ok(raw) => Decimal::from_str(raw.trim()).map_err(|e| {
                        AppError::InvalidInput(format!("SEED_TOTAL_HOURS '{}': {}", raw, e))
                    })?,
                    Err(_) => DEFAULT_TOTAL_HOURS,
                };
                Some(SeedAccount {
                    name: env::var("SEED_NAME").unwrap_or_else(|_| student_id.clone()),
                    password: env::var("SEED_PASSWORD")?,
                    student_id,
                    total_hours_required,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            server_addr,
            seed,
        })
    }
}
