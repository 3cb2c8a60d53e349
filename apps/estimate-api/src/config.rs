//! # Service Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            0.0.0.0:8080, ./rules, 5% tax                   │
//! │  2. TOML file           $INKQUOTE_CONFIG, else ./inkquote.toml          │
//! │  3. Environment         INKQUOTE_HOST, INKQUOTE_PORT, ...               │
//! │  4. validate()          bad values stop startup                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! request_timeout_secs = 10
//!
//! [rules]
//! dir = "/srv/inkquote/rules"
//!
//! [pricing]
//! tax_rate_bps = 500
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use inkquote_core::validation::validate_tax_rate_bps;
use inkquote_core::{TaxRate, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Names a config file to load instead of `./inkquote.toml`.
pub const CONFIG_PATH_VAR: &str = "INKQUOTE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "inkquote.toml";

// =============================================================================
// Sections
// =============================================================================

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests running longer than this get a 408.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// `[rules]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesSettings {
    /// Directory holding the CSV rule tables.
    #[serde(default = "default_rules_dir")]
    pub dir: PathBuf,
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

impl Default for RulesSettings {
    fn default() -> Self {
        RulesSettings {
            dir: default_rules_dir(),
        }
    }
}

/// `[pricing]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Sales tax in basis points (500 = 5%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_tax_rate_bps() -> u32 {
    inkquote_core::SALES_TAX_RATE.bps()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub rules: RulesSettings,

    #[serde(default)]
    pub pricing: PricingSettings,
}

impl ServerConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .ok();
        Self::load_from(path)
    }

    /// Loads configuration with an explicit file path.
    ///
    /// An explicitly named file must exist; the default `./inkquote.toml`
    /// is optional.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_file(&path)?,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read_file(&fallback)?
                } else {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `INKQUOTE_*` environment variables.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = lookup("INKQUOTE_HOST") {
            debug!(host = %host, "Overriding host from environment");
            self.server.host = host;
        }

        if let Some(port) = lookup("INKQUOTE_PORT") {
            self.server.port = parse_var("INKQUOTE_PORT", &port)?;
        }

        if let Some(timeout) = lookup("INKQUOTE_REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = parse_var("INKQUOTE_REQUEST_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(dir) = lookup("INKQUOTE_RULES_DIR") {
            debug!(dir = %dir, "Overriding rules directory from environment");
            self.rules.dir = PathBuf::from(dir);
        }

        if let Some(bps) = lookup("INKQUOTE_TAX_RATE_BPS") {
            self.pricing.tax_rate_bps = parse_var("INKQUOTE_TAX_RATE_BPS", &bps)?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue(format!("server.host '{}'", self.server.host)))?;

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "server.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.rules.dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("rules.dir".to_string()));
        }

        validate_tax_rate_bps(self.pricing.tax_rate_bps)?;
        Ok(())
    }

    /// The socket address to bind.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidValue(format!("server.host '{}'", self.server.host)))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pricing.tax_rate_bps)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
