//! KerkPoint data types.
//!
//! These types represent the records returned by the KerkPoint API. Every
//! field is optional: the API is loosely typed and a missing field must not
//! cost us the rest of the record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::cache::KEY_PREFIX;
use crate::types::{lenient_id, BuildingId, PreacherId, ServiceId};

/// The upstream collections this client can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `GET /api/services`
    Services,
    /// `GET /api/collectiongoals`
    CollectionGoals,
    /// `GET /api/preachers`
    Preachers,
    /// `GET /api/buildings`
    Buildings,
}

impl Resource {
    /// Every resource, in a fixed order.
    pub const ALL: [Self; 4] = [Self::Services, Self::CollectionGoals, Self::Preachers, Self::Buildings];

    /// Path segment after `/api/`.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::CollectionGoals => "collectiongoals",
            Self::Preachers => "preachers",
            Self::Buildings => "buildings",
        }
    }

    /// Cache key for this resource's payload.
    pub fn cache_key(self) -> String {
        format!("{KEY_PREFIX}{}", self.path())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A scheduled church service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service id; joins to [`Preacher::service_id`].
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<ServiceId>,
    /// Calendar date as sent by the API, usually `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    /// Start time as sent by the API, usually `HH:MM[:SS]`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Building the service takes place in.
    #[serde(default, deserialize_with = "lenient_id")]
    pub location: Option<BuildingId>,
}

/// A collection (donation) goal with its payment link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionGoal {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Payment request URL.
    #[serde(default)]
    pub payment_request: Option<String>,
    /// When the payment link stops being valid.
    #[serde(default)]
    pub payment_request_expiry: Option<String>,
}

/// A preacher assigned to a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preacher {
    /// Preacher id.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<PreacherId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Service this preacher leads.
    #[serde(default, deserialize_with = "lenient_id")]
    pub service_id: Option<ServiceId>,
}

/// A church building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Building id; joins to [`Service::location`].
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<BuildingId>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Non-empty, trimmed name of a record, if any.
pub(crate) fn present(name: Option<&String>) -> Option<&str> {
    name.map(|n| n.trim()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn resource_paths_and_keys() {
        assert_eq!(Resource::CollectionGoals.path(), "collectiongoals");
        assert_eq!(Resource::Buildings.cache_key(), "kerkpoint_data_buildings");
        let keys: std::collections::HashSet<_> = Resource::ALL.iter().map(|r| r.cache_key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn service_decodes_loose_fields() {
        let service: Service = serde_json::from_value(json!({
            "id": "12",
            "date": "2024-06-02",
            "start_time": "10:00:00",
            "location": 5,
            "extra": true
        }))
        .unwrap();
        assert_eq!(service.id, Some(ServiceId(12)));
        assert_eq!(service.location, Some(BuildingId(5)));
        assert_eq!(service.start_time.as_deref(), Some("10:00:00"));
    }

    #[test]
    fn missing_fields_are_none() {
        let preacher: Preacher = serde_json::from_value(json!({"name": "Ds. Jansen"})).unwrap();
        assert_eq!(preacher.id, None);
        assert_eq!(preacher.service_id, None);

        let service: Service = serde_json::from_value(json!({"location": null})).unwrap();
        assert_eq!(service, Service::default());
    }
}
