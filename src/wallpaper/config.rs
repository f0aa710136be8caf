//! Configuration for the wallpaper generator.
//!
//! [`WallpaperConfig`] carries the API credential and a handful of tunables.
//! It is loaded once at startup, usually through [`WallpaperConfig::from_env`].
//! A missing credential is a [`ConfigError`], so an application without a key
//! never gets far enough to attempt a generation.
//!
//! # Example
//!
//! ```rust
//! use ai_wallpaper::WallpaperConfig;
//! use std::time::Duration;
//!
//! let config = WallpaperConfig::new("my-api-key")
//!     .with_download_dir("/tmp/wallpapers")
//!     .with_remix_delay(Duration::ZERO);
//!
//! assert_eq!(config.model, "imagen-4.0-generate-001");
//! ```

use std::env;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Primary environment variable holding the API credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Secondary credential variable, checked when [`API_KEY_ENV`] is unset.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Pause between closing the viewer and starting a remix.
pub const DEFAULT_REMIX_DELAY: Duration = Duration::from_millis(100);

/// Errors raised while loading configuration. These are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No usable credential was found in the environment.
    MissingCredential,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCredential => write!(
                f,
                "{} environment variable is not set (nor {})",
                API_KEY_ENV, GEMINI_API_KEY_ENV
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the image client and the interaction controller.
#[derive(Clone)]
pub struct WallpaperConfig {
    /// Credential sent to the image service. Never logged.
    pub api_key: String,
    /// Image model identifier, e.g. `imagen-4.0-generate-001`.
    pub model: String,
    /// Base URL of the Generative Language API, without a trailing slash.
    pub base_url: String,
    /// Directory that `download` writes into.
    pub download_dir: PathBuf,
    /// Delay between closing the viewer and resubmitting on remix.
    pub remix_delay: Duration,
}

impl WallpaperConfig {
    /// Build a config around an explicit credential with default tunables.
    pub fn new(api_key: impl Into<String>) -> Self {
        WallpaperConfig {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            download_dir: PathBuf::from("."),
            remix_delay: DEFAULT_REMIX_DELAY,
        }
    }

    /// Load the config from the process environment.
    ///
    /// Reads `API_KEY` (falling back to `GEMINI_API_KEY`), and the optional
    /// `IMAGEN_MODEL`, `IMAGEN_BASE_URL` and `WALLPAPER_DOWNLOAD_DIR` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup,
    /// so callers (and tests) do not have to mutate the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_blank(API_KEY_ENV)
            .or_else(|| non_blank(GEMINI_API_KEY_ENV))
            .ok_or(ConfigError::MissingCredential)?;

        let mut config = WallpaperConfig::new(api_key.trim());
        if let Some(model) = non_blank("IMAGEN_MODEL") {
            config = config.with_model(model.trim());
        }
        if let Some(base_url) = non_blank("IMAGEN_BASE_URL") {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(dir) = non_blank("WALLPAPER_DOWNLOAD_DIR") {
            config = config.with_download_dir(dir);
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_remix_delay(mut self, delay: Duration) -> Self {
        self.remix_delay = delay;
        self
    }
}

impl fmt::Debug for WallpaperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WallpaperConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("download_dir", &self.download_dir)
            .field("remix_delay", &self.remix_delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let result = WallpaperConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingCredential);
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let result = WallpaperConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingCredential);
    }

    #[test]
    fn test_gemini_key_is_used_as_fallback() {
        let config =
            WallpaperConfig::from_lookup(lookup_from(&[(GEMINI_API_KEY_ENV, "gem-key")])).unwrap();
        assert_eq!(config.api_key, "gem-key");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = WallpaperConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "primary"),
            (GEMINI_API_KEY_ENV, "secondary"),
            ("IMAGEN_MODEL", "imagen-3.0-generate-002"),
            ("IMAGEN_BASE_URL", "http://localhost:9000/v1beta/"),
            ("WALLPAPER_DOWNLOAD_DIR", "/tmp/walls"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "primary");
        assert_eq!(config.model, "imagen-3.0-generate-002");
        assert_eq!(config.base_url, "http://localhost:9000/v1beta");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/walls"));
        assert_eq!(config.remix_delay, DEFAULT_REMIX_DELAY);
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", WallpaperConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
