use chrono::{FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Sale channels (`invoices.mode`) included in the report
    pub sale_modes: Vec<i32>,
    /// Offset used to decide what "today" is when resolving week/month windows
    pub utc_offset_hours: i32,
    /// Salespeople whose name contains this (case-insensitive) are left out of the report
    pub excluded_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("DATABASE_MAX_CONNECTIONS must be a number"),
            sale_modes: parse_sale_modes(
                &env::var("REPORT_SALE_MODES").unwrap_or_else(|_| "1,2".to_string()),
            )
            .expect("REPORT_SALE_MODES must be a comma-separated list of numbers"),
            utc_offset_hours: env::var("REPORT_UTC_OFFSET_HOURS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("REPORT_UTC_OFFSET_HOURS must be a number"),
            excluded_name: env::var("REPORT_EXCLUDED_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Falls back to UTC when the configured hours are out of range.
    pub fn report_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn parse_sale_modes(raw: &str) -> Result<Vec<i32>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
