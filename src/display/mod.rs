//! View models for the public widgets.
//!
//! Every widget returns a [`Widget`]: ready data, a localized "nothing to
//! show" message, or a failure message whose wording depends on who is
//! looking. Rendering to HTML or a terminal is up to the caller.

use chrono::{Local, NaiveDateTime};
use std::fmt;

use crate::error::Error;
use crate::locale::{Locale, Text};
use crate::projection::BuildingLabel;

/// Collection goals with payment links
pub mod goals;
/// Services overview and next service day
pub mod services;
/// Latest recorded services from the RSS playlist
pub mod sermons;

pub use goals::{collection_goals, GoalRow, GoalsView};
pub use services::{next_services, services_overview, BuildingColumn, NextServicesView, ServiceRow, ServicesOverview};
pub use sermons::{latest_sermons, SermonsView};

/// Result of rendering one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget<T> {
    /// Data to show.
    Ready(T),
    /// Nothing to show; carries the localized empty-state text.
    Empty(String),
    /// The data could not be fetched; carries audience-specific text.
    Failed(String),
}

impl<T> Widget<T> {
    /// The ready value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Empty(_) | Self::Failed(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Widget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => value.fmt(f),
            Self::Empty(message) | Self::Failed(message) => writeln!(f, "{message}"),
        }
    }
}

/// Who the widget is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    /// A signed-in user allowed to manage the site; sees raw error text.
    Operator,
    /// Anyone else.
    #[default]
    Visitor,
}

/// Everything a widget needs besides its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Who is looking.
    pub audience: Audience,
    /// Language for labels and messages.
    pub locale: Locale,
    /// Local wall-clock time the page is rendered at.
    pub now: NaiveDateTime,
}

impl DisplayContext {
    /// Context with an explicit render time.
    #[must_use]
    pub const fn new(audience: Audience, locale: Locale, now: NaiveDateTime) -> Self {
        Self { audience, locale, now }
    }

    /// Context rendered at the current local time.
    #[must_use]
    pub fn current(audience: Audience, locale: Locale) -> Self {
        Self::new(audience, locale, Local::now().naive_local())
    }

    /// Localized fixed text.
    pub const fn text(&self, key: Text) -> &'static str {
        self.locale.text(key)
    }

    /// Failure text for this audience: the error itself for operators, a
    /// generic message for visitors.
    pub fn failure_message(&self, error: &Error, generic: Text) -> String {
        match self.audience {
            Audience::Operator => format!("{}{error}", self.text(Text::AdminNote)),
            Audience::Visitor => self.text(generic).to_string(),
        }
    }

    /// Display name for a building bucket.
    #[must_use]
    pub fn building_label(&self, label: &BuildingLabel) -> String {
        match label {
            BuildingLabel::Named(name) => name.clone(),
            BuildingLabel::Unknown => self.text(Text::UnknownBuilding).to_string(),
            BuildingLabel::Other => self.text(Text::OtherServices).to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::testing::at;
    use super::*;

    #[test]
    fn operators_see_the_error_visitors_do_not() {
        let error = Error::upstream(503, "Service Unavailable");
        let operator = DisplayContext::new(Audience::Operator, Locale::Nl, at(2024, 6, 1, 9));
        let visitor = DisplayContext { audience: Audience::Visitor, ..operator };

        assert_eq!(
            operator.failure_message(&error, Text::ServicesUnavailable),
            "ADMIN OPMERKING: API Error (503): Service Unavailable"
        );
        assert_eq!(
            visitor.failure_message(&error, Text::ServicesUnavailable),
            "Er kon geen dienstenoverzicht worden opgehaald."
        );
    }

    #[test]
    fn building_labels_are_localized() {
        let ctx = DisplayContext::new(Audience::Visitor, Locale::En, at(2024, 6, 1, 9));
        assert_eq!(ctx.building_label(&BuildingLabel::Named("Grote Kerk".into())), "Grote Kerk");
        assert_eq!(ctx.building_label(&BuildingLabel::Unknown), "Unknown building");
        assert_eq!(ctx.building_label(&BuildingLabel::Other), "Other services");
    }

    #[test]
    fn widget_display_prints_messages() {
        let widget: Widget<String> = Widget::Empty("nothing".into());
        assert_eq!(widget.to_string(), "nothing\n");
        assert!(widget.ready().is_none());
    }
}
