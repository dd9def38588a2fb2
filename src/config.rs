use std::env;

use crate::error::{Error, Result};

pub const DEFAULT_DB_PATH: &str = "inventory.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let db_path = env::var("INVENTORY_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        if db_path.trim().is_empty() {
            return Err(Error::Config("INVENTORY_DB must not be empty".to_string()));
        }

        let log_level =
            env::var("INVENTORY_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        match log_level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => {}
            other => {
                return Err(Error::Config(format!(
                    "Invalid INVENTORY_LOG value: {}",
                    other
                )))
            }
        }

        Ok(Self { db_path, log_level })
    }

    /// Replaces the database path when one was given on the command line.
    pub fn with_db_path(mut self, db_path: Option<String>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }
}
