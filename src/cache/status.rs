//! Last-attempt bookkeeping for upstream fetches.
//!
//! Kept apart from the data cache: a success stays visible for a day even
//! after the cached payload has expired, a failure only for a few minutes.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::constants::cache::{ERROR_RETENTION_SECS, SUCCESS_RETENTION_SECS};
use crate::locale::{Locale, Text};

/// Outcome of the most recent upstream attempt that is still retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing recorded, or the record has aged out.
    NoAttempt,
    /// The last attempt stored fresh data.
    Succeeded {
        /// When the attempt finished.
        at: DateTime<Utc>,
    },
    /// The last attempt failed.
    Failed {
        /// When the attempt finished.
        at: DateTime<Utc>,
        /// Recorded error text.
        message: String,
    },
}

impl FetchStatus {
    /// Human-readable summary for administrators.
    pub fn summary(&self, locale: Locale) -> String {
        match self {
            Self::NoAttempt => locale.text(Text::NoAttemptYet).to_string(),
            Self::Succeeded { at } => {
                locale.fetch_succeeded(&at.format(locale.timestamp_format()).to_string())
            }
            Self::Failed { at, message } => {
                locale.fetch_failed(&at.format(locale.timestamp_format()).to_string(), message)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct StatusRecord {
    status: FetchStatus,
    visible_until: DateTime<Utc>,
}

/// Thread-safe store for the single [`FetchStatus`] record.
pub struct FetchStatusLog {
    record: Mutex<Option<StatusRecord>>,
    clock: Arc<dyn Clock>,
}

impl FetchStatusLog {
    /// Create an empty log.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { record: Mutex::new(None), clock }
    }

    /// Record a successful fetch, replacing any earlier error.
    pub fn record_success(&self) {
        let at = self.clock.now();
        self.store(FetchStatus::Succeeded { at }, at + Duration::seconds(SUCCESS_RETENTION_SECS));
    }

    /// Record a failed fetch.
    pub fn record_failure(&self, message: impl Into<String>) {
        let at = self.clock.now();
        self.store(
            FetchStatus::Failed { at, message: message.into() },
            at + Duration::seconds(ERROR_RETENTION_SECS),
        );
    }

    /// The retained status, or [`FetchStatus::NoAttempt`] once it has aged out.
    pub fn current(&self) -> FetchStatus {
        let now = self.clock.now();
        self.record
            .lock()
            .ok()
            .and_then(|record| record.clone())
            .filter(|record| now < record.visible_until)
            .map_or(FetchStatus::NoAttempt, |record| record.status)
    }

    /// Forget everything.
    pub fn clear(&self) {
        if let Ok(mut record) = self.record.lock() {
            *record = None;
        }
    }

    fn store(&self, status: FetchStatus, visible_until: DateTime<Utc>) {
        if let Ok(mut record) = self.record.lock() {
            *record = Some(StatusRecord { status, visible_until });
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn setup() -> (Arc<ManualClock>, FetchStatusLog) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()));
        let log = FetchStatusLog::new(Arc::clone(&clock) as Arc<dyn Clock>);
        (clock, log)
    }

    #[test]
    fn starts_with_no_attempt() {
        let (_clock, log) = setup();
        assert_eq!(log.current(), FetchStatus::NoAttempt);
        assert_eq!(log.current().summary(Locale::En), "No attempt yet.");
    }

    #[test]
    fn failure_ages_out_after_five_minutes() {
        let (clock, log) = setup();
        log.record_failure("timeout");
        assert!(matches!(log.current(), FetchStatus::Failed { ref message, .. } if message == "timeout"));

        clock.advance(Duration::seconds(ERROR_RETENTION_SECS));
        assert_eq!(log.current(), FetchStatus::NoAttempt);
    }

    #[test]
    fn success_replaces_error_and_lasts_a_day() {
        let (clock, log) = setup();
        log.record_failure("boom");
        clock.advance(Duration::seconds(10));
        log.record_success();
        assert!(matches!(log.current(), FetchStatus::Succeeded { .. }));

        clock.advance(Duration::hours(23));
        assert!(matches!(log.current(), FetchStatus::Succeeded { .. }));
        clock.advance(Duration::hours(1));
        assert_eq!(log.current(), FetchStatus::NoAttempt);
    }

    #[test]
    fn summaries_render_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let failed = FetchStatus::Failed { at, message: "API Error (500): Internal Server Error".into() };
        assert_eq!(
            failed.summary(Locale::En),
            "Error on 2024-06-01 09:30:00: API Error (500): Internal Server Error"
        );
        assert_eq!(
            FetchStatus::Succeeded { at }.summary(Locale::Nl),
            "Succes op 01-06-2024 09:30:00 (Data is gecached)"
        );
    }

    #[test]
    fn clear_forgets_status() {
        let (_clock, log) = setup();
        log.record_success();
        log.clear();
        assert_eq!(log.current(), FetchStatus::NoAttempt);
    }
}
