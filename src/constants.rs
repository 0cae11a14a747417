//! Application constants.
//!
//! Centralizes magic numbers and configuration values for better maintainability.

/// KerkPoint API constants.
pub mod api {
    /// Hard cap on a single upstream request, in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Path segment between the base URL and the resource name.
    pub const API_PATH: &str = "api";
}

/// Cache and fetch-status constants.
pub mod cache {
    /// Default data cache lifetime in seconds (one hour).
    pub const DEFAULT_TTL_SECS: i64 = 3600;

    /// Longest cache lifetime accepted, in minutes (one year).
    pub const MAX_TTL_MINUTES: i64 = 525_600;

    /// Prefix for resource cache keys.
    pub const KEY_PREFIX: &str = "kerkpoint_data_";

    /// How long a failed attempt stays visible in the fetch status.
    pub const ERROR_RETENTION_SECS: i64 = 300;

    /// How long a successful attempt stays visible in the fetch status.
    pub const SUCCESS_RETENTION_SECS: i64 = 86_400;
}

/// Widget defaults.
pub mod display {
    /// Default look-ahead window for the services overview.
    pub const DEFAULT_DAYS_AHEAD: i64 = 90;

    /// Characters of `start_time` shown (`HH:MM`).
    pub const TIME_DISPLAY_LEN: usize = 5;
}

/// Sermon feed constants.
pub mod feed {
    /// Host serving the sermon playlists.
    pub const PLAYLIST_HOST: &str = "kerkdienstgemist.nl";

    /// Playlist used when none is configured.
    pub const DEFAULT_PLAYLIST_ID: &str = "246";

    /// Items shown by default.
    pub const DEFAULT_MAX_ITEMS: usize = 10;
}

/// QR image constants.
pub mod qr {
    /// Module size in pixels.
    pub const DEFAULT_SIZE: u32 = 5;

    /// Quiet zone in modules.
    pub const DEFAULT_MARGIN: u32 = 2;
}

/// Admin action constants.
pub mod admin {
    /// Lifetime of a one-time action token in seconds.
    pub const NONCE_LIFETIME_SECS: i64 = 86_400;

    /// Action name for the cache-clear trigger.
    pub const CLEAR_CACHE_ACTION: &str = "clear_cache";
}
