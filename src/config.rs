//! Persistent tool configuration model and defaults.

use std::time::Duration;

pub const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const PLACEHOLDER_LASTFM_API_KEY: &str = "<CHANGE_ME>";
pub const DEFAULT_USER_AGENT: &str = "CoverGrabber";
pub const DEFAULT_IMAGE_SIZES: [&str; 3] = ["extralarge", "large", "medium"];
pub const DEFAULT_AUDIO_EXTENSIONS: [&str; 10] = [
    "mp3", "flac", "ogg", "opus", "m4a", "mp4", "wav", "aac", "wv", "ape",
];
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 15;

/// Root configuration read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Remote metadata service settings.
    #[serde(default)]
    pub lastfm: LastFmConfig,
    /// Library discovery settings.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Album lookup and image download settings for the Last.fm service.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LastFmConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Size labels in preference order; the first one with a URL wins.
    #[serde(default = "default_image_sizes")]
    pub image_sizes: Vec<String>,
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

/// Which files count as audio tracks while walking the library.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,
}

impl Default for LastFmConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            image_sizes: default_image_sizes(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            audio_extensions: default_audio_extensions(),
        }
    }
}

impl LastFmConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Returns true when no real key has been configured.
    pub fn has_placeholder_api_key(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || key == PLACEHOLDER_LASTFM_API_KEY
    }
}

fn default_api_key() -> String {
    PLACEHOLDER_LASTFM_API_KEY.to_string()
}

fn default_api_url() -> String {
    DEFAULT_LASTFM_API_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_image_sizes() -> Vec<String> {
    DEFAULT_IMAGE_SIZES.iter().map(|size| size.to_string()).collect()
}

fn default_lookup_timeout_secs() -> u64 {
    DEFAULT_LOOKUP_TIMEOUT_SECS
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_audio_extensions() -> Vec<String> {
    DEFAULT_AUDIO_EXTENSIONS
        .iter()
        .map(|extension| extension.to_string())
        .collect()
}

fn normalized_labels(values: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let label = value.trim().trim_start_matches('.').to_ascii_lowercase();
        if !label.is_empty() && !normalized.contains(&label) {
            normalized.push(label);
        }
    }
    normalized
}

/// Clamps loaded values back into a usable range.
pub fn sanitize_config(config: Config) -> Config {
    let mut config = config;

    config.lastfm.api_key = config.lastfm.api_key.trim().to_string();
    if config.lastfm.api_url.trim().is_empty() {
        config.lastfm.api_url = default_api_url();
    }
    if config.lastfm.user_agent.trim().is_empty() {
        config.lastfm.user_agent = default_user_agent();
    }

    config.lastfm.image_sizes = normalized_labels(&config.lastfm.image_sizes);
    if config.lastfm.image_sizes.is_empty() {
        config.lastfm.image_sizes = default_image_sizes();
    }

    if config.lastfm.lookup_timeout_secs == 0 {
        config.lastfm.lookup_timeout_secs = DEFAULT_LOOKUP_TIMEOUT_SECS;
    }
    if config.lastfm.download_timeout_secs == 0 {
        config.lastfm.download_timeout_secs = DEFAULT_DOWNLOAD_TIMEOUT_SECS;
    }

    config.library.audio_extensions = normalized_labels(&config.library.audio_extensions);
    if config.library.audio_extensions.is_empty() {
        config.library.audio_extensions = default_audio_extensions();
    }

    config
}
