//! Pure transformations from API records to display-ready structures.
//!
//! Nothing in here performs I/O; callers fetch through the client and
//! hand the records over.

/// Date and time parsing
pub mod dates;
/// Collection goal ordering and expiry filtering
pub mod goals;
/// Grouping per building and next service day
pub mod schedule;

pub use dates::{parse_date, parse_date_time, parse_time};
pub use goals::{active_goals, sort_by_expiry};
pub use schedule::{
    clamp_days, distinct_locations, group_by_building, next_occurring, within_window, Bucket,
    BuildingLabel, GroupOrder, NextServiceDay, ServiceGroup,
};
