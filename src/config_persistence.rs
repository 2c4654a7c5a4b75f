use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{sanitize_config, Config};

const CONFIG_DIR_NAME: &str = "covergrabber";
const CONFIG_FILE_NAME: &str = "config.toml";
const API_KEY_ENV_VAR: &str = "LASTFM_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Location of the user config file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(config: &mut Config, api_key_override: Option<String>) {
    if let Some(api_key) = api_key_override {
        let api_key = api_key.trim();
        if !api_key.is_empty() {
            config.lastfm.api_key = api_key.to_string();
        }
    }
}

/// Loads the config at `path` when it exists; nothing is ever written.
///
/// Every failure degrades to defaults with a warning; the scan never stops
/// because of configuration.
pub fn load_config(path: Option<&Path>) -> Config {
    let mut config = match path {
        Some(path) if path.exists() => read_config_file(path).unwrap_or_else(|err| {
            warn!("{err}. Using default configuration");
            Config::default()
        }),
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config, std::env::var(API_KEY_ENV_VAR).ok());
    sanitize_config(config)
}
