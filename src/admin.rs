//! Privileged cache control and the cache status dashboard.
//!
//! Clearing the cache needs a signed-in operator with manage rights and a
//! one-time token issued for that action. Tokens expire after a day and are
//! consumed on first use, whether the action then succeeds or not.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::api::KerkPointClient;
use crate::clock::Clock;
use crate::constants::admin::{CLEAR_CACHE_ACTION, NONCE_LIFETIME_SECS};
use crate::error::{Error, Result};
use crate::locale::{Locale, Text};
use crate::settings::SettingsStore;

/// The user asking for a privileged action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// Display name, used in logs.
    pub name: String,
    /// Whether the user is signed in.
    pub authenticated: bool,
    /// Whether the user may manage site settings.
    pub can_manage: bool,
}

impl Operator {
    /// A signed-in user with manage rights.
    pub fn manager(name: impl Into<String>) -> Self {
        Self { name: name.into(), authenticated: true, can_manage: true }
    }

    /// Whether this user may run privileged actions at all.
    pub const fn is_authorized(&self) -> bool {
        self.authenticated && self.can_manage
    }
}

#[derive(Debug, Clone)]
struct Nonce {
    action: String,
    expires_at: DateTime<Utc>,
}

/// One-time anti-forgery tokens bound to an action name.
pub struct NonceRegistry {
    issued: Mutex<HashMap<String, Nonce>>,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl NonceRegistry {
    /// Registry issuing tokens with the standard one-day lifetime.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            issued: Mutex::new(HashMap::new()),
            lifetime: Duration::seconds(NONCE_LIFETIME_SECS),
            clock,
        }
    }

    /// Issue a fresh token for `action`.
    pub fn issue(&self, action: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let now = self.clock.now();
        let mut issued = self.issued.lock().unwrap_or_else(|e| e.into_inner());
        issued.retain(|_, nonce| nonce.expires_at > now);
        issued.insert(token.clone(), Nonce { action: action.to_string(), expires_at: now + self.lifetime });
        token
    }

    /// Consume `token`; true only if it was issued for `action` and is unexpired.
    pub fn consume(&self, action: &str, token: &str) -> bool {
        let now = self.clock.now();
        let mut issued = self.issued.lock().unwrap_or_else(|e| e.into_inner());
        match issued.remove(token) {
            Some(nonce) => nonce.action == action && nonce.expires_at > now,
            None => false,
        }
    }

    /// Tokens currently outstanding, expired ones included.
    pub fn outstanding(&self) -> usize {
        self.issued.lock().map_or(0, |issued| issued.len())
    }
}

/// Cache status as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDashboard {
    /// When the cache was last cleared by hand, or that it never was.
    pub last_cleared: String,
    /// Outcome of the last upstream fetch.
    pub last_fetch: String,
    /// Data cache lifetime in minutes.
    pub refresh_minutes: i64,
}

/// Entry point for the privileged cache actions.
pub struct CacheAdmin {
    client: KerkPointClient,
    nonces: NonceRegistry,
    settings: SettingsStore,
}

impl CacheAdmin {
    /// Bind the admin actions to a client and the settings file.
    pub fn new(client: KerkPointClient, settings: SettingsStore) -> Self {
        let nonces = NonceRegistry::new(client.clock());
        Self { client, nonces, settings }
    }

    /// Issue a one-time token for clearing the cache.
    pub fn issue_clear_token(&self, operator: &Operator) -> Result<String> {
        if !operator.is_authorized() {
            tracing::warn!("Refused clear-cache token for {}", operator.name);
            return Err(Error::Unauthorized(format!("{} may not manage the cache", operator.name)));
        }
        Ok(self.nonces.issue(CLEAR_CACHE_ACTION))
    }

    /// Clear every cached resource and record when it happened.
    ///
    /// The token is consumed before the operator's rights are checked, so a
    /// rejected attempt cannot be replayed either.
    pub fn clear_cache(&self, operator: &Operator, token: &str) -> Result<DateTime<Utc>> {
        let token_ok = self.nonces.consume(CLEAR_CACHE_ACTION, token);
        if !token_ok || !operator.is_authorized() {
            tracing::warn!("Rejected cache clear by {} (token valid: {token_ok})", operator.name);
            return Err(Error::Unauthorized(if token_ok {
                format!("{} may not manage the cache", operator.name)
            } else {
                "invalid or expired token".to_string()
            }));
        }

        self.client.clear_cache();
        let at = self.client.clock().now();
        self.settings.record_cache_cleared(at)?;
        tracing::info!("Cache cleared by {}", operator.name);
        Ok(at)
    }

    /// Current cache status for the dashboard.
    pub fn dashboard(&self, locale: Locale) -> Result<CacheDashboard> {
        let settings = self.settings.load()?;
        let last_cleared = settings.cache_last_cleared.map_or_else(
            || locale.text(Text::CacheNeverCleared).to_string(),
            |at| locale.cache_cleared_at(&at.format(locale.timestamp_format()).to_string()),
        );
        Ok(CacheDashboard {
            last_cleared,
            last_fetch: self.client.fetch_status_summary(locale),
            refresh_minutes: self.client.cache_ttl().num_minutes(),
        })
    }

    /// The token registry, for callers embedding tokens in forms.
    pub const fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }
}
