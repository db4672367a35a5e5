/**
* filename : config
* author : HAMA
* date: 2026. 10. 19.
* description: 거래소 접속 정보와 로깅 설정
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;
use crate::exchange::binance_futures::{MAINNET_URL, TESTNET_URL};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Overrides the testnet/mainnet URL when set
    pub base_url: Option<String>,
    pub testnet: bool,
    pub recv_window_ms: u64,
    pub timeout_ms: u64,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl ExchangeConfig {
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ if self.testnet => TESTNET_URL.to_string(),
            _ => MAINNET_URL.to_string(),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            api_key: None,
            api_secret: None,
            base_url: None,
            testnet: true,
            recv_window_ms: 5000,
            timeout_ms: 10_000,
            dry_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file_path: Some("bot.log".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from `config.json` in the working directory
    pub fn load() -> Result<Self, TradingError> {
        Self::load_from(Path::new("config.json"))
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self, TradingError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| TradingError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Apply environment variable overrides for sensitive/runtime fields
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("BINANCE_API_KEY") { self.exchange.api_key = Some(v); }
        if let Some(v) = non_empty("BINANCE_API_SECRET") { self.exchange.api_secret = Some(v); }
        if let Some(v) = non_empty("BINANCE_BASE_URL") { self.exchange.base_url = Some(v); }
        if let Some(v) = non_empty("BINANCE_TESTNET").and_then(|v| parse_flag(&v)) { self.exchange.testnet = v; }
        if let Some(v) = non_empty("DRY_RUN").and_then(|v| parse_flag(&v)) { self.exchange.dry_run = v; }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    let lower = value.to_lowercase();
    if ["1", "true", "yes"].contains(&lower.as_str()) { return Some(true); }
    if ["0", "false", "no"].contains(&lower.as_str()) { return Some(false); }
    None
}
