//! Ordering and filtering of collection goals by payment-link expiry.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::api::types::CollectionGoal;
use crate::projection::dates::parse_date;

/// Expiry assumed for goals that do not state one.
fn open_ended() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
}

/// Effective expiry of a goal.
///
/// A missing or blank expiry sorts after everything; one that does not
/// parse sorts before everything.
#[must_use]
pub fn effective_expiry(goal: &CollectionGoal) -> NaiveDateTime {
    match stated_expiry(goal) {
        None => open_ended(),
        Some(raw) => parse_date(raw).unwrap_or(NaiveDateTime::MIN),
    }
}

/// Stable sort ascending by effective expiry.
pub fn sort_by_expiry(goals: &mut [CollectionGoal]) {
    goals.sort_by_key(effective_expiry);
}

/// Whether the goal's payment link is still valid at `now`.
///
/// Only a stated expiry can keep a goal on display: a missing or blank one
/// sorts last but is never active.
#[must_use]
pub fn is_active(goal: &CollectionGoal, now: NaiveDateTime) -> bool {
    stated_expiry(goal).is_some() && effective_expiry(goal) >= now
}

fn stated_expiry(goal: &CollectionGoal) -> Option<&str> {
    goal.payment_request_expiry.as_deref().map(str::trim).filter(|e| !e.is_empty())
}

/// Sort the full list, then keep the goals that have not expired.
#[must_use]
pub fn active_goals(mut goals: Vec<CollectionGoal>, now: NaiveDateTime) -> Vec<CollectionGoal> {
    sort_by_expiry(&mut goals);
    goals.retain(|g| is_active(g, now));
    goals
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn goal(name: &str, expiry: Option<&str>) -> CollectionGoal {
        CollectionGoal {
            name: Some(name.to_string()),
            payment_request: Some(format!("https://pay.example.nl/{name}")),
            payment_request_expiry: expiry.map(str::to_string),
        }
    }

    fn names(goals: &[CollectionGoal]) -> Vec<&str> {
        goals.iter().filter_map(|g| g.name.as_deref()).collect()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn expired_goal_is_dropped() {
        let goals = vec![goal("A", Some("2024-01-01")), goal("B", Some("2099-01-01"))];
        assert_eq!(names(&active_goals(goals, now())), vec!["B"]);
    }

    #[test]
    fn missing_expiry_sorts_last_but_is_never_shown() {
        let mut goals = vec![
            goal("open", None),
            goal("late", Some("2024-12-24 23:59:59")),
            goal("blank", Some("  ")),
            goal("soon", Some("2024-06-15")),
        ];
        sort_by_expiry(&mut goals);
        assert_eq!(names(&goals), vec!["soon", "late", "open", "blank"]);

        assert!(!is_active(&goal("open", None), now()));
        assert!(!is_active(&goal("blank", Some("")), now()));
        assert_eq!(names(&active_goals(goals, now())), vec!["soon", "late"]);
    }

    #[test]
    fn unparseable_expiry_counts_as_expired() {
        let mut goals = vec![goal("ok", Some("2099-01-01")), goal("bad", Some("binnenkort"))];
        sort_by_expiry(&mut goals);
        assert_eq!(names(&goals), vec!["bad", "ok"]);
        assert_eq!(names(&active_goals(goals, now())), vec!["ok"]);
    }

    #[test]
    fn goal_expiring_today_later_is_still_active() {
        let g = goal("today", Some("2024-06-01 18:00:00"));
        assert!(is_active(&g, now()));
        assert!(!is_active(&goal("morning", Some("2024-06-01 08:00:00")), now()));
    }
}
