//! User-visible strings in the languages the widgets can render.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Language used for labels and fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Dutch.
    Nl,
    /// English.
    #[default]
    En,
}

/// Keys for every fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    /// Bucket label for a location the buildings resource does not know.
    UnknownBuilding,
    /// Bucket label for services without a location.
    OtherServices,
    /// Preacher or author fallback.
    Unknown,
    /// Collection goal without a name.
    UnknownGoal,
    /// Prefix for error text shown to operators.
    AdminNote,
    /// Visitor message when collection goals cannot be fetched.
    GoalsUnavailable,
    /// Visitor message when services cannot be fetched.
    ServicesUnavailable,
    /// No active collection goals.
    NoGoals,
    /// No services inside the display window.
    NoServicesInWindow,
    /// No service dated today or later.
    NoUpcomingServices,
    /// Feed returned nothing.
    NoSermons,
    /// Feed item without a description.
    NoDescription,
    /// QR requested for an empty link.
    QrMissing,
    /// QR encoder produced no bytes.
    QrGenerationFailed,
    /// Prefix for QR encoder errors.
    QrError,
    /// Fetch status before any attempt.
    NoAttemptYet,
    /// Dashboard message when the cache was never cleared.
    CacheNeverCleared,
}

impl Locale {
    /// Parse a locale code such as `nl` or `en-GB`.
    pub fn from_code(code: &str) -> Option<Self> {
        let lower = code.trim().to_lowercase();
        match lower.split(['-', '_']).next() {
            Some("nl") => Some(Self::Nl),
            Some("en") => Some(Self::En),
            _ => None,
        }
    }

    /// Look up a fixed message.
    pub const fn text(self, key: Text) -> &'static str {
        match self {
            Self::Nl => match key {
                Text::UnknownBuilding => "Onbekend Gebouw",
                Text::OtherServices => "Overige Diensten",
                Text::Unknown => "Onbekend",
                Text::UnknownGoal => "Onbekend doel",
                Text::AdminNote => "ADMIN OPMERKING: ",
                Text::GoalsUnavailable => "Er kon geen collecte-informatie worden opgehaald.",
                Text::ServicesUnavailable => "Er kon geen dienstenoverzicht worden opgehaald.",
                Text::NoGoals => "Er zijn momenteel geen collectedoelen beschikbaar.",
                Text::NoServicesInWindow => {
                    "Er zijn momenteel geen geplande diensten bekend binnen de ingestelde periode."
                }
                Text::NoUpcomingServices => "Er zijn geen komende diensten gevonden.",
                Text::NoSermons => "Er zijn geen kerkdiensten gevonden.",
                Text::NoDescription => "Geen details beschikbaar.",
                Text::QrMissing => "QR Link mist.",
                Text::QrGenerationFailed => "Generatie mislukt.",
                Text::QrError => "QR Fout: ",
                Text::NoAttemptYet => "Nog geen oproep gedaan.",
                Text::CacheNeverCleared => "De cache is nog nooit geleegd.",
            },
            Self::En => match key {
                Text::UnknownBuilding => "Unknown building",
                Text::OtherServices => "Other services",
                Text::Unknown => "Unknown",
                Text::UnknownGoal => "Unknown goal",
                Text::AdminNote => "ADMIN NOTE: ",
                Text::GoalsUnavailable => "Collection information could not be retrieved.",
                Text::ServicesUnavailable => "The service overview could not be retrieved.",
                Text::NoGoals => "There are currently no collection goals available.",
                Text::NoServicesInWindow => "There are no scheduled services within the selected period.",
                Text::NoUpcomingServices => "No upcoming services were found.",
                Text::NoSermons => "No church services were found.",
                Text::NoDescription => "No details available.",
                Text::QrMissing => "QR link missing.",
                Text::QrGenerationFailed => "Generation failed.",
                Text::QrError => "QR error: ",
                Text::NoAttemptYet => "No attempt yet.",
                Text::CacheNeverCleared => "The cache has never been cleared.",
            },
        }
    }

    /// `Error on {time}: {message}`
    pub fn fetch_failed(self, time: &str, message: &str) -> String {
        match self {
            Self::Nl => format!("Fout op {time}: {message}"),
            Self::En => format!("Error on {time}: {message}"),
        }
    }

    /// `Success on {time} (data is cached)`
    pub fn fetch_succeeded(self, time: &str) -> String {
        match self {
            Self::Nl => format!("Succes op {time} (Data is gecached)"),
            Self::En => format!("Success on {time} (data is cached)"),
        }
    }

    /// `Last cache clear: {time}`
    pub fn cache_cleared_at(self, time: &str) -> String {
        match self {
            Self::Nl => format!("Laatste cache-clear: {time}"),
            Self::En => format!("Last cache clear: {time}"),
        }
    }

    /// `chrono` format string for calendar dates.
    pub const fn date_format(self) -> &'static str {
        match self {
            Self::Nl => "%d-%m-%Y",
            Self::En => "%Y-%m-%d",
        }
    }

    /// `chrono` format string for timestamps in status messages.
    pub const fn timestamp_format(self) -> &'static str {
        match self {
            Self::Nl => "%d-%m-%Y %H:%M:%S",
            Self::En => "%Y-%m-%d %H:%M:%S",
        }
    }

    /// Full weekday name.
    pub const fn weekday(self, day: Weekday) -> &'static str {
        match (self, day) {
            (Self::Nl, Weekday::Mon) => "maandag",
            (Self::Nl, Weekday::Tue) => "dinsdag",
            (Self::Nl, Weekday::Wed) => "woensdag",
            (Self::Nl, Weekday::Thu) => "donderdag",
            (Self::Nl, Weekday::Fri) => "vrijdag",
            (Self::Nl, Weekday::Sat) => "zaterdag",
            (Self::Nl, Weekday::Sun) => "zondag",
            (Self::En, Weekday::Mon) => "Monday",
            (Self::En, Weekday::Tue) => "Tuesday",
            (Self::En, Weekday::Wed) => "Wednesday",
            (Self::En, Weekday::Thu) => "Thursday",
            (Self::En, Weekday::Fri) => "Friday",
            (Self::En, Weekday::Sat) => "Saturday",
            (Self::En, Weekday::Sun) => "Sunday",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_codes() {
        assert_eq!(Locale::from_code("nl"), Some(Locale::Nl));
        assert_eq!(Locale::from_code("NL_nl"), Some(Locale::Nl));
        assert_eq!(Locale::from_code("en-GB"), Some(Locale::En));
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn status_messages_follow_locale() {
        assert_eq!(
            Locale::En.fetch_failed("2024-06-01 10:00:00", "boom"),
            "Error on 2024-06-01 10:00:00: boom"
        );
        assert!(Locale::Nl.fetch_succeeded("01-06-2024 10:00:00").starts_with("Succes op"));
    }

    #[test]
    fn weekday_names() {
        assert_eq!(Locale::Nl.weekday(Weekday::Sun), "zondag");
        assert_eq!(Locale::En.weekday(Weekday::Sun), "Sunday");
    }
}
