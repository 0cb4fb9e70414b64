use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// Hosted backend connection. Both fields must be set for the remote
/// backend to be selected; anything less runs local-only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentsConfig {
    /// Secret API key of the payments provider. Unset means the payment
    /// step of the hold flow is skipped entirely.
    pub secret_key: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Default intent amount in cents when the client does not send one.
    #[serde(default = "default_intent_amount_cents")]
    pub default_intent_amount_cents: i64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            currency: default_currency(),
            default_intent_amount_cents: default_intent_amount_cents(),
        }
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_intent_amount_cents() -> i64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Seconds between hold-expiry sweeps.
    #[serde(default = "default_hold_expiry_interval")]
    pub hold_expiry_interval: u64,
    /// Seconds between session snapshot writes.
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            hold_expiry_interval: default_hold_expiry_interval(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

fn default_hold_expiry_interval() -> u64 {
    300
}

fn default_snapshot_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
