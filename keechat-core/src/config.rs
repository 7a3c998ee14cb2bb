use std::path::{Path, PathBuf};

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{KeechatError, KeechatResult};

/// Application configuration.
///
/// Layered: built-in defaults, then `keechat.toml` in the user config
/// dir, then one in the working directory, then an explicit `--config`
/// file, then `KEECHAT_`-prefixed environment variables
/// (e.g. `KEECHAT_API__BASE_URL`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeechatConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend endpoint settings. One base URL serves both the chat flow and
/// the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "keechat=info".to_string()
}

/// Per-user config directory (`~/.config/keechat` on Linux).
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keechat"))
}

impl KeechatConfig {
    pub fn load() -> KeechatResult<Self> {
        Self::load_from(None)
    }

    pub fn load_from(path: Option<&Path>) -> KeechatResult<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(dir) = get_config_dir() {
            builder = builder.add_source(File::from(dir.join("keechat.toml")).required(false));
        }
        builder = builder.add_source(File::with_name("keechat").required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder = builder.add_source(Environment::with_prefix("KEECHAT").separator("__"));

        let cfg: KeechatConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> KeechatResult<()> {
        reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            KeechatError::Config(config::ConfigError::Message(format!(
                "invalid api.base_url `{}`: {}",
                self.api.base_url, e
            )))
        })?;
        Ok(())
    }
}
