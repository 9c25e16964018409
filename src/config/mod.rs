/*
 * Configuration management for the curve quote service
 */

use crate::models::{LaunchpadError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const BSC_MAINNET_CHAIN_ID: u64 = 56;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chain: ChainConfig,
    pub quote: QuoteConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// Amount quoted when a request omits one.
    pub default_amount: String,
    pub impact_warn_pct: Decimal,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            default_amount: "1".to_string(),
            impact_warn_pct: Decimal::from(5),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|e| LaunchpadError::ConfigError(format!("Invalid port: {e}")))?,
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "text".to_string())
                    .parse()?,
            },
            chain: ChainConfig {
                rpc_url: env::var("BSC_RPC_URL")
                    .map_err(|_| LaunchpadError::ConfigError("BSC_RPC_URL not set".to_string()))?,
                chain_id: match env::var("BSC_CHAIN_ID") {
                    Ok(id) => id
                        .parse()
                        .map_err(|e| LaunchpadError::ConfigError(format!("Invalid chain id: {e}")))?,
                    Err(_) => BSC_MAINNET_CHAIN_ID,
                },
            },
            quote: QuoteConfig {
                default_amount: env::var("QUOTE_DEFAULT_AMOUNT")
                    .unwrap_or_else(|_| QuoteConfig::default().default_amount),
                impact_warn_pct: match env::var("QUOTE_IMPACT_WARN_PCT") {
                    Ok(pct) => Decimal::from_str(&pct).map_err(|e| {
                        LaunchpadError::ConfigError(format!("Invalid impact warning threshold: {e}"))
                    })?,
                    Err(_) => QuoteConfig::default().impact_warn_pct,
                },
            },
        })
    }
}

impl FromStr for LogFormat {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(LaunchpadError::ConfigError(format!("Unknown log format: {s}"))),
        }
    }
}
