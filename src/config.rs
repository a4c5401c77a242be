use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::tabular::{DEFAULT_MAX_ROWS, DEFAULT_PREVIEW_ROWS};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5002/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub preview_rows: usize,
    pub max_parsed_rows: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            data: DataConfig {
                preview_rows: DEFAULT_PREVIEW_ROWS,
                max_parsed_rows: DEFAULT_MAX_ROWS,
            },
            logging: LoggingConfig {
                log_dir: PathBuf::from("logs"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api: ApiConfig {
                base_url: env::var("ANALYSIS_API_URL")
                    .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()?,
            },
            data: DataConfig {
                preview_rows: env::var("PREVIEW_ROWS")
                    .unwrap_or_else(|_| DEFAULT_PREVIEW_ROWS.to_string())
                    .parse()?,
                max_parsed_rows: env::var("MAX_PARSED_ROWS")
                    .unwrap_or_else(|_| DEFAULT_MAX_ROWS.to_string())
                    .parse()?,
            },
            logging: LoggingConfig {
                log_dir: env::var("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("logs")),
            },
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = timeout_secs {
            self.api.timeout_secs = secs;
        }
        self
    }
}
