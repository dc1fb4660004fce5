// ⚙️ Configuration
//
// Layers, lowest priority first: built-in defaults, TOML file, environment
// (`DIRECTORY_FEED_URL`, `DIRECTORY_PAGE_SIZE`, `DIRECTORY_SHEETS__CLIENTS`...).

use crate::error::ConfigError;
use crate::feed::{HttpSheetSource, TabNames};
use crate::query::DEFAULT_PAGE_SIZE;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Public CSV export of the directory spreadsheet.
pub const DEFAULT_FEED_URL: &str =
    "https://docs.google.com/spreadsheets/d/1PBN_HQOi5ZpKDd63mouxttFvvCwtmY97Tb5if5_cdBA/gviz/tq?tqx=out:csv";

pub const DEFAULT_CONFIG_FILE: &str = "directory.toml";
pub const ENV_PREFIX: &str = "DIRECTORY_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub feed_url: String,
    pub sheets: TabNames,
    pub page_size: usize,
    pub log_level: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            feed_url: DEFAULT_FEED_URL.to_string(),
            sheets: TabNames::default(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    /// Load defaults, then `path` (or `directory.toml` if present), then env.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::from_figment(Self::figment(file))
    }

    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_url.trim().is_empty() {
            return Err(ConfigError::Invalid("feed_url must not be empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        for (key, tab) in [
            ("sheets.clients", &self.sheets.clients),
            ("sheets.accounts", &self.sheets.accounts),
            ("sheets.agencies", &self.sheets.agencies),
        ] {
            if tab.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    /// HTTP transport for this configuration.
    pub fn sheet_source(&self) -> HttpSheetSource {
        HttpSheetSource::with_tabs(self.feed_url.clone(), self.sheets.clone())
    }
}

/// Install the global subscriber on stderr. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }
}
