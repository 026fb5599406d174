use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Optional config file looked up in the working directory
pub const CONFIG_FILE: &str = "chartdir.toml";

/// Prefix for environment overrides, e.g. `CHARTDIR_PORT=8080`
pub const ENV_PREFIX: &str = "CHARTDIR_";

/// Runtime settings for the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interface to bind (default: 127.0.0.1)
    pub host: String,

    /// Port to bind (default: 5000)
    pub port: u16,

    /// Directory every request path is resolved against (default: home directory)
    pub root: PathBuf,

    /// Open the listing page in the default browser once the server is bound
    pub open_browser: bool,

    /// List entries whose name starts with a dot
    pub show_hidden: bool,

    /// Maximum number of chart sessions kept in memory
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            root: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            open_browser: true,
            show_hidden: false,
            max_sessions: 256,
        }
    }
}

impl AppConfig {
    /// Defaults, then `chartdir.toml`, then `CHARTDIR_*` environment variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate the layered configuration
    pub fn load() -> Result<Self> {
        let config: AppConfig = Self::figment()
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::ValidationError("port must be > 0".to_string()));
        }
        if self.max_sessions == 0 {
            return Err(AppError::ValidationError(
                "max_sessions must be > 0".to_string(),
            ));
        }
        if !self.root.is_dir() {
            return Err(AppError::ValidationError(format!(
                "root {} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }

    /// Address the listing page is reachable at
    pub fn base_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" => "localhost",
            host => host,
        };
        format!("http://{}:{}/", host, self.port)
    }
}
