use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_vars(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("MAX_FILE_SIZE").ok(),
        )
    }

    fn from_vars(bind_addr: Option<String>, max_file_size: Option<String>) -> Result<Self> {
        let bind_addr = bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3000")?;

        let max_file_size = match max_file_size {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_FILE_SIZE must be a byte count, got {:?}", raw))?,
            None => default_max_file_size(),
        };

        if max_file_size == 0 {
            anyhow::bail!("MAX_FILE_SIZE must be greater than zero");
        }

        Ok(Config { bind_addr, max_file_size })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_file_size: default_max_file_size(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::new()?;
    tracing::info!(
        "Configuration loaded: bind_addr={}, max_file_size={}KB",
        config.bind_addr,
        config.max_file_size / 1024
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_vars_are_unset() {
        let config = Config::from_vars(None, None).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = Config::from_vars(
            Some("0.0.0.0:8080".to_string()),
            Some(" 2048 ".to_string()),
        )
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.max_file_size, 2048);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_vars(Some("localhost".to_string()), None).is_err());
        assert!(Config::from_vars(None, Some("ten megs".to_string())).is_err());
        assert!(Config::from_vars(None, Some("0".to_string())).is_err());
    }
}
