use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Security configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Failed login attempts allowed before the ATM locks for the session
    pub max_login_attempts: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { max_login_attempts: 3 }
    }
}

/// Display configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Symbol printed in front of currency amounts
    pub currency_symbol: String,
    /// chrono format string for transaction timestamps
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Format an amount with two decimals and the currency symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// An account created at startup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeedAccount {
    pub id: String,
    pub pin: u32,
    pub balance: f64,
}

impl SeedAccount {
    pub fn new(id: &str, pin: u32, balance: f64) -> Self {
        Self {
            id: id.to_string(),
            pin,
            balance,
        }
    }
}

/// Global application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Application version
    pub version: String,
    /// Security configuration
    pub security: SecurityConfig,
    /// Display configuration
    pub display: DisplayConfig,
    /// Accounts available for the session
    pub accounts: Vec<SeedAccount>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "ATM Simulator".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            security: SecurityConfig::default(),
            display: DisplayConfig::default(),
            accounts: vec![
                SeedAccount::new("12345", 1111, 5000.00),
                SeedAccount::new("67890", 2222, 1200.50),
            ],
        }
    }
}

impl Config {
    /// Reject settings the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.security.max_login_attempts == 0 {
            return Err(anyhow!("security.max_login_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Load configuration from file, writing the defaults there if it does not exist
pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        info!("Configuration file {} not found, writing defaults", path);
        let default_config = Config::default();
        save_config(path, &default_config)?;
        return Ok(default_config);
    }

    let mut file = File::open(path).context(format!("Failed to open config file: {}", path))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).context("Failed to read config file")?;

    let config: Config = match path.ends_with(".toml") {
        true => toml::from_str(&contents).context("Failed to parse TOML config")?,
        false => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };
    config.validate()?;

    debug!("Loaded configuration with {} seed accounts", config.accounts.len());
    Ok(config)
}

/// Save configuration to file
pub fn save_config(path: &str, config: &Config) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    let serialized = match path.ends_with(".toml") {
        true => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        false => serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?,
    };

    std::fs::write(path, serialized).context(format!("Failed to write config to file: {}", path))?;

    Ok(())
}
