//! Application configuration.
//!
//! Handles loading configuration from the persisted settings file, environment
//! variables and .env files. The result is a plain value handed to
//! [`KerkPointClient`](crate::api::KerkPointClient); nothing reads it globally.

use chrono::Duration;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::api::Resource;
use crate::constants::api::API_PATH;
use crate::constants::cache::{DEFAULT_TTL_SECS, MAX_TTL_MINUTES};
use crate::constants::feed::DEFAULT_PLAYLIST_ID;
use crate::error::Result;
use crate::locale::Locale;
use crate::settings::{Settings, SettingsStore};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    pub(crate) app_name: String,
    /// The application version
    pub(crate) app_version: String,
    /// Base URL of the KerkPoint API, e.g. `https://api.example.nl`
    pub api_url: String,
    /// Bearer token sent with every API request
    pub api_token: String,
    /// How long fetched resources stay cached
    pub cache_ttl: Duration,
    /// Sermon playlist shown by the RSS widget
    pub rss_playlist_id: String,
    /// Language of widget labels and messages
    pub locale: Locale,
    /// Where the admin settings are persisted
    pub settings_path: PathBuf,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            api_url: String::new(),
            api_token: String::new(),
            cache_ttl: Duration::seconds(DEFAULT_TTL_SECS),
            rss_playlist_id: DEFAULT_PLAYLIST_ID.to_string(),
            locale: Locale::default(),
            settings_path: SettingsStore::default_path(),
        }
    }
}

impl Config {
    /// Load configuration from the settings file and environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let settings_path = env::var("KERKPOINT_SETTINGS").ok().map_or_else(
            SettingsStore::default_path,
            |path| PathBuf::from(shellexpand::tilde(&path).to_string()),
        );

        let store = SettingsStore::new(settings_path);
        let mut config = Self::from_settings(&store.load()?);
        config.settings_path = store.path().to_path_buf();

        if let Ok(url) = env::var("KERKPOINT_API_URL") {
            config.api_url = url;
        }

        if let Ok(token) = env::var("KERKPOINT_API_TOKEN") {
            config.api_token = token;
        }

        // Cache lifetime is configured in minutes, like the settings form
        if let Ok(minutes) = env::var("KERKPOINT_CACHE_MINUTES") {
            match minutes.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => config.cache_ttl = Duration::minutes(minutes.min(MAX_TTL_MINUTES)),
                _ => tracing::warn!("Ignoring invalid KERKPOINT_CACHE_MINUTES value {minutes:?}"),
            }
        }

        if let Ok(playlist) = env::var("KERKPOINT_RSS_PLAYLIST") {
            config.rss_playlist_id = playlist;
        }

        if let Ok(code) = env::var("KERKPOINT_LOCALE") {
            match Locale::from_code(&code) {
                Some(locale) => config.locale = locale,
                None => tracing::warn!("Unknown KERKPOINT_LOCALE {code:?}, keeping {:?}", config.locale),
            }
        }

        Ok(config)
    }

    /// Build a configuration from persisted admin settings
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self {
            api_url: settings.api_url.clone(),
            api_token: settings.api_token.clone(),
            ..Self::default()
        };
        if settings.cache_duration > 0 {
            // Hand-edited files can hold anything; cap like the settings form does
            config.cache_ttl = Duration::seconds(settings.cache_duration.min(MAX_TTL_MINUTES * 60));
        }
        if !settings.rss_playlist_id.trim().is_empty() {
            config.rss_playlist_id = settings.rss_playlist_id.trim().to_string();
        }
        config
    }

    /// Check if the API URL and token are both set
    pub fn has_api_credentials(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_token.trim().is_empty()
    }

    /// Full URL of a resource endpoint, `{base}/api/{resource}`
    pub fn endpoint_url(&self, resource: Resource) -> String {
        format!("{}/{API_PATH}/{}", self.api_url.trim().trim_end_matches('/'), resource.path())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn endpoint_url_has_single_slash() {
        let mut config = Config { api_url: "https://api.example.nl".into(), ..Config::default() };
        assert_eq!(config.endpoint_url(Resource::Services), "https://api.example.nl/api/services");

        config.api_url = "https://api.example.nl/".into();
        assert_eq!(
            config.endpoint_url(Resource::CollectionGoals),
            "https://api.example.nl/api/collectiongoals"
        );
    }

    #[test]
    fn credentials_require_url_and_token() {
        let mut config = Config::default();
        assert!(!config.has_api_credentials());
        config.api_url = "https://api.example.nl".into();
        assert!(!config.has_api_credentials());
        config.api_token = "secret".into();
        assert!(config.has_api_credentials());
    }

    #[test]
    fn from_settings_falls_back_to_defaults() {
        let settings = Settings {
            api_url: "https://api.example.nl".into(),
            api_token: "t".into(),
            cache_duration: 0,
            rss_playlist_id: String::new(),
            cache_last_cleared: None,
        };
        let config = Config::from_settings(&settings);
        assert_eq!(config.cache_ttl, Duration::seconds(DEFAULT_TTL_SECS));
        assert_eq!(config.rss_playlist_id, DEFAULT_PLAYLIST_ID);

        let settings = Settings { cache_duration: 600, rss_playlist_id: "77".into(), ..settings };
        let config = Config::from_settings(&settings);
        assert_eq!(config.cache_ttl, Duration::minutes(10));
        assert_eq!(config.rss_playlist_id, "77");
    }

    #[test]
    fn oversized_stored_duration_is_capped() {
        let settings = Settings { cache_duration: i64::MAX, ..Settings::default() };
        let config = Config::from_settings(&settings);
        assert_eq!(config.cache_ttl, Duration::minutes(MAX_TTL_MINUTES));
    }
}
