//! Grouping of services per building and selection of the next service day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

use crate::api::types::{present, Building, Service};
use crate::projection::dates::{parse_date, parse_date_time, parse_time};
use crate::types::{BuildingId, ServiceId};

/// Which group a service lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Services held in a known location.
    Building(BuildingId),
    /// Services without a location.
    Other,
}

impl Bucket {
    /// Bucket of a single service.
    #[must_use]
    pub fn of(service: &Service) -> Self {
        service.location.map_or(Self::Other, Self::Building)
    }

    /// Numeric key; `0` for [`Bucket::Other`].
    pub const fn key(self) -> u64 {
        match self {
            Self::Building(id) => id.get(),
            Self::Other => 0,
        }
    }
}

/// Display name of a bucket, resolved without choosing a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildingLabel {
    /// Name from the buildings resource.
    Named(String),
    /// Location the buildings resource does not know (or failed to load).
    Unknown,
    /// The bucket for services without a location.
    Other,
}

/// Services of one bucket, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceGroup {
    /// Bucket these services share.
    pub bucket: Bucket,
    /// Resolved display name.
    pub label: BuildingLabel,
    /// Services in display order.
    pub services: Vec<Service>,
}

/// Sort key within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// `date` and `start_time` as one instant.
    DateTime,
    /// `start_time` only; used when every service shares a day.
    StartTime,
}

/// Locations referenced by `services`, in first-seen order.
#[must_use]
pub fn distinct_locations(services: &[Service]) -> Vec<BuildingId> {
    let mut seen = Vec::new();
    for id in services.iter().filter_map(|s| s.location) {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

/// Partition services per location and sort each partition.
///
/// Buckets appear in the order their first service appears. Sorting is
/// stable, and services whose sort key does not parse come first.
#[must_use]
pub fn group_by_building(
    services: Vec<Service>,
    buildings: &HashMap<BuildingId, Building>,
    order: GroupOrder,
) -> Vec<ServiceGroup> {
    let mut groups: Vec<ServiceGroup> = Vec::new();
    let mut index: HashMap<Bucket, usize> = HashMap::new();

    for service in services {
        let bucket = Bucket::of(&service);
        let idx = *index.entry(bucket).or_insert_with(|| {
            groups.push(ServiceGroup {
                bucket,
                label: label_for(bucket, buildings),
                services: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].services.push(service);
    }

    for group in &mut groups {
        match order {
            GroupOrder::DateTime => group.services.sort_by_key(service_instant),
            GroupOrder::StartTime => group.services.sort_by_key(start_time),
        }
    }
    groups
}

fn label_for(bucket: Bucket, buildings: &HashMap<BuildingId, Building>) -> BuildingLabel {
    match bucket {
        Bucket::Other => BuildingLabel::Other,
        Bucket::Building(id) => buildings.get(&id)
            .and_then(|b| present(b.name.as_ref()))
            .map_or(BuildingLabel::Unknown, |name| BuildingLabel::Named(name.to_string())),
    }
}

/// `date` + `start_time` of a service as one instant.
pub fn service_instant(service: &Service) -> Option<NaiveDateTime> {
    parse_date_time(service.date.as_deref(), service.start_time.as_deref())
}

fn start_time(service: &Service) -> Option<NaiveTime> {
    service.start_time.as_deref().and_then(parse_time)
}

/// Normalise an optional look-ahead in days: default when absent, never negative.
#[must_use]
pub fn clamp_days(days: Option<i64>, default: i64) -> i64 {
    days.unwrap_or(default).max(0)
}

/// Keep services dated no later than `now + days`.
///
/// Services without a parseable date are dropped. A window reaching past the
/// calendar's end has no upper bound.
#[must_use]
pub fn within_window(services: Vec<Service>, now: NaiveDateTime, days: i64) -> Vec<Service> {
    let limit = Duration::try_days(days.max(0)).and_then(|span| now.checked_add_signed(span));
    services.into_iter()
        .filter(|s| {
            s.date.as_deref()
                .and_then(parse_date)
                .is_some_and(|day| limit.map_or(true, |limit| day <= limit))
        })
        .collect()
}

/// The first day on or after today that has services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextServiceDay {
    /// The date exactly as the API wrote it.
    pub date: String,
    /// The parsed calendar day.
    pub day: NaiveDate,
    /// Services whose raw date equals [`Self::date`], in input order.
    pub services: Vec<Service>,
}

/// Select the services of the earliest date that is not in the past.
///
/// The raw date string is the grouping key: two spellings of the same day
/// are two different dates, and only the earliest-parsing spelling (the
/// first seen on a tie) is returned.
#[must_use]
pub fn next_occurring(services: &[Service], today: NaiveDate) -> Option<NextServiceDay> {
    let today_start = today.and_time(NaiveTime::MIN);

    let (date, when) = services.iter()
        .filter_map(|s| {
            let raw = s.date.as_deref().filter(|d| !d.trim().is_empty())?;
            let when = parse_date(raw)?;
            (when >= today_start).then_some((raw, when))
        })
        .min_by_key(|(_, when)| *when)?;

    let selected = services.iter()
        .filter(|s| s.date.as_deref() == Some(date))
        .cloned()
        .collect();

    Some(NextServiceDay { date: date.to_string(), day: when.date(), services: selected })
}

/// Name of the preacher leading `service`, if known.
#[must_use]
pub fn preacher_for<'a>(service: &Service, by_service: &'a HashMap<ServiceId, String>) -> Option<&'a str> {
    service.id.and_then(|id| by_service.get(&id)).map(String::as_str)
}
