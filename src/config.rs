use serde::Deserialize;
use std::path::PathBuf;

/// Dataset location used when `DATA_FILE` is unset or blank.
pub const DEFAULT_DATA_FILE: &str = "data/base.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub max_body_bytes: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_body_bytes: 5 * 1024 * 1024,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            data_file: std::env::var("DATA_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| defaults.max_body_bytes.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_BODY_BYTES must be a positive number"))?,
            rate_limit_per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| defaults.rate_limit_per_second.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a number"))
                .and_then(|rate: u64| {
                    if rate == 0 {
                        anyhow::bail!("RATE_LIMIT_PER_SECOND must be greater than zero");
                    }
                    Ok(rate)
                })?,
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| defaults.rate_limit_burst.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a number"))
                .and_then(|burst: u32| {
                    if burst == 0 {
                        anyhow::bail!("RATE_LIMIT_BURST must be greater than zero");
                    }
                    Ok(burst)
                })?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Data file: {}", config.data_file.display());
        tracing::debug!("Max body size: {} bytes", config.max_body_bytes);
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
