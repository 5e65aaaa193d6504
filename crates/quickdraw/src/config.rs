//! Server configuration, loaded from an optional TOML file plus
//! environment overrides.
//!
//! ```toml
//! listenPort = 8080
//! bindHost = "127.0.0.1"
//! countdownMin = 3000      # ms
//! countdownMax = 10000     # ms
//! cooldownDuration = 5000  # ms
//! ```
//!
//! Every key is optional. `QUICKDRAW_CONFIG` names the file;
//! `QUICKDRAW_PORT` overrides `listenPort`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quickdraw_game::DuelConfig;
use serde::Deserialize;

/// Environment variable holding the config file path.
pub const CONFIG_PATH_ENV: &str = "QUICKDRAW_CONFIG";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "QUICKDRAW_PORT";

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level server configuration. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub bind_host: String,
    pub countdown_min: u64,
    pub countdown_max: u64,
    pub cooldown_duration: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let duel = DuelConfig::default();
        Self {
            listen_port: 80,
            bind_host: "0.0.0.0".to_string(),
            countdown_min: duel.countdown_min.as_millis() as u64,
            countdown_max: duel.countdown_max.as_millis() as u64,
            cooldown_duration: duel.cooldown.as_millis() as u64,
        }
    }
}

impl ServerConfig {
    /// Loads from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads using `var` to look up environment variables.
    pub fn load_with(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match var(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            Some(path) => {
                let config = Self::from_file(Path::new(&path))?;
                tracing::info!(%path, "loaded configuration");
                config
            }
            None => {
                tracing::info!("no config file given, using defaults");
                Self::default()
            }
        };

        if let Some(port) = var(PORT_ENV).filter(|p| !p.is_empty()) {
            match port.parse::<u16>() {
                Ok(port) => config.listen_port = port,
                Err(e) => {
                    tracing::warn!(%port, error = %e, "ignoring invalid {PORT_ENV}");
                }
            }
        }

        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `host:port`, bracketing IPv6 hosts.
    pub fn listen_addr(&self) -> String {
        if self.bind_host.contains(':') {
            format!("[{}]:{}", self.bind_host, self.listen_port)
        } else {
            format!("{}:{}", self.bind_host, self.listen_port)
        }
    }

    /// The duel timings, validated.
    pub fn duel(&self) -> DuelConfig {
        DuelConfig {
            countdown_min: Duration::from_millis(self.countdown_min),
            countdown_max: Duration::from_millis(self.countdown_max),
            cooldown: Duration::from_millis(self.cooldown_duration),
        }
        .validated()
    }
}
