//! Persisted admin settings.
//!
//! The settings form submits raw strings; [`SettingsForm::sanitize`] turns
//! them into a [`Settings`] record which [`SettingsStore`] keeps as JSON.

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::cache::MAX_TTL_MINUTES;
use crate::error::{Error, Result};

/// Settings file name
const SETTINGS_FILE: &str = "settings.json";

/// Stored configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base API URL.
    #[serde(default)]
    pub api_url: String,

    /// Bearer token.
    #[serde(default)]
    pub api_token: String,

    /// Cache lifetime in seconds (entered as minutes).
    #[serde(default)]
    pub cache_duration: i64,

    /// Sermon playlist id, numeric by convention.
    #[serde(default)]
    pub rss_playlist_id: String,

    /// Audit timestamp of the last manual cache clear.
    #[serde(default)]
    pub cache_last_cleared: Option<DateTime<Utc>>,
}

impl Settings {
    /// Cache lifetime as shown in the form.
    pub const fn cache_minutes(&self) -> i64 {
        self.cache_duration / 60
    }
}

/// Raw values as submitted by the settings form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    /// Base API URL.
    pub api_url: String,
    /// Bearer token.
    pub api_token: String,
    /// Cache lifetime in minutes.
    pub cache_duration: String,
    /// Sermon playlist id.
    #[serde(default)]
    pub rss_playlist_id: String,
}

impl SettingsForm {
    /// Validate and normalise the form into a settings record.
    ///
    /// The audit timestamp is carried over from `previous`.
    pub fn sanitize(&self, previous: &Settings) -> Result<Settings> {
        let api_url = sanitize_url(&self.api_url)?;
        let api_token = sanitize_text(&self.api_token);

        let minutes = self
            .cache_duration
            .trim()
            .parse::<i64>()
            .map(i64::saturating_abs)
            .map_err(|e| Error::invalid_setting("cache_duration", format!("not a whole number: {e}")))?;
        if minutes == 0 {
            return Err(Error::invalid_setting("cache_duration", "must be at least one minute"));
        }
        if minutes > MAX_TTL_MINUTES {
            return Err(Error::invalid_setting(
                "cache_duration",
                format!("at most {MAX_TTL_MINUTES} minutes"),
            ));
        }

        Ok(Settings {
            api_url,
            api_token,
            cache_duration: minutes * 60,
            rss_playlist_id: sanitize_text(&self.rss_playlist_id),
            cache_last_cleared: previous.cache_last_cleared,
        })
    }
}

fn sanitize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let url = Url::parse(trimmed).map_err(|e| Error::invalid_setting("api_url", e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_setting("api_url", format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(trimmed.to_string())
}

fn sanitize_text(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_control()).collect::<String>().trim().to_string()
}

/// JSON file holding the [`Settings`] record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform config location, e.g. `~/.config/kerkpoint/settings.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(".kerkpoint").join(SETTINGS_FILE),
            |dir| dir.join("kerkpoint").join(SETTINGS_FILE),
        )
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record; a missing file yields defaults.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let text = fs_err::read_to_string(&self.path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::parse(format!("Invalid settings JSON: {e}"), self.path.clone()))
    }

    /// Write the record, creating parent directories as needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::parse(format!("Cannot serialize settings: {e}"), self.path.clone()))?;
        fs_err::write(&self.path, json)?;
        Ok(())
    }

    /// Persist the time of a manual cache clear.
    pub fn record_cache_cleared(&self, at: DateTime<Utc>) -> Result<()> {
        let mut settings = self.load()?;
        settings.cache_last_cleared = Some(at);
        self.save(&settings)
    }
}
