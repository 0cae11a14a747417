//! End-to-end behaviour of the client and widgets against a scripted upstream.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, clippy::field_reassign_with_default)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kerkpoint::admin::{CacheAdmin, Operator};
use kerkpoint::api::{KerkPointClient, RawResponse, Resource, Transport};
use kerkpoint::cache::{CacheStore, FetchStatus, MemoryCache};
use kerkpoint::clock::{Clock, ManualClock};
use kerkpoint::config::Config;
use kerkpoint::constants::cache::MAX_TTL_MINUTES;
use kerkpoint::display::{self, Audience, DisplayContext, Widget};
use kerkpoint::error::{Error, Result};
use kerkpoint::locale::Locale;
use kerkpoint::settings::{Settings, SettingsForm, SettingsStore};
use kerkpoint::types::{PreacherId, ServiceId};

/// What the fake upstream answers for one resource.
#[derive(Clone)]
enum Reply {
    Body(&'static str),
    Status(u16, &'static str),
    Offline,
}

struct FakeUpstream {
    replies: Mutex<HashMap<&'static str, Reply>>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    fn new() -> Arc<Self> {
        let mut replies = HashMap::new();
        replies.insert("services", Reply::Body(SERVICES));
        replies.insert("preachers", Reply::Body(PREACHERS));
        replies.insert("buildings", Reply::Body(BUILDINGS));
        replies.insert("collectiongoals", Reply::Body(GOALS));
        Arc::new(Self { replies: Mutex::new(replies), calls: AtomicUsize::new(0) })
    }

    fn set(&self, resource: &'static str, reply: Reply) {
        self.replies.lock().unwrap().insert(resource, reply);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeUpstream {
    async fn get(&self, url: &str, token: &str) -> Result<RawResponse> {
        assert_eq!(token, "t0ken");
        self.calls.fetch_add(1, Ordering::SeqCst);
        let resource = url.rsplit('/').next().unwrap_or_default();
        let reply = self.replies.lock().unwrap().get(resource).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(RawResponse::ok(body)),
            Some(Reply::Status(status, reason)) => {
                Ok(RawResponse { status, reason: reason.to_string(), body: String::new() })
            }
            Some(Reply::Offline) | None => Err(Error::Transport("connection reset".into())),
        }
    }
}

const SERVICES: &str = r#"[
    {"id": 10, "date": "2024-06-02", "start_time": "10:00:00", "location": 1},
    {"id": 11, "date": "2024-06-02", "start_time": "16:30:00", "location": "2"},
    {"id": 12, "date": "2024-06-09", "start_time": "10:00:00", "location": 1},
    {"id": 13, "date": "2024-05-26", "start_time": "10:00:00", "location": 1}
]"#;

const PREACHERS: &str = r#"[
    {"id": 100, "name": "Ds. J. Jansen", "service_id": 10},
    {"id": "101", "name": "Prop. K. de Boer", "service_id": 11}
]"#;

const BUILDINGS: &str = r#"[
    {"id": 1, "name": "Dorpskerk"},
    {"id": 2, "name": "Ontmoetingscentrum"}
]"#;

const GOALS: &str = r#"[
    {"name": "Zending", "payment_request": "https://pay.example.nl/z", "payment_request_expiry": "2024-12-31"},
    {"name": "Verlopen", "payment_request": "https://pay.example.nl/v", "payment_request_expiry": "2024-01-01"}
]"#;

struct Harness {
    upstream: Arc<FakeUpstream>,
    clock: Arc<ManualClock>,
    cache: Arc<MemoryCache>,
    client: KerkPointClient,
}

fn harness() -> Harness {
    let upstream = FakeUpstream::new();
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap()));
    let dyn_clock: Arc<dyn Clock> = Arc::clone(&clock) as Arc<dyn Clock>;
    let cache = Arc::new(MemoryCache::with_clock(Arc::clone(&dyn_clock)));
    let mut config = Config::default();
    config.api_url = "https://kerkpoint.example.nl/".into();
    config.api_token = "t0ken".into();
    config.cache_ttl = Duration::minutes(15);
    let client = KerkPointClient::with_parts(
        &config,
        Arc::clone(&upstream) as Arc<dyn Transport>,
        Arc::clone(&cache) as Arc<dyn CacheStore>,
        dyn_clock,
    );
    Harness { upstream, clock, cache, client }
}

fn ctx(audience: Audience) -> DisplayContext {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
    DisplayContext::new(audience, Locale::Nl, now)
}

#[tokio::test]
async fn every_resource_is_fetched_once_per_ttl() {
    let h = harness();
    for resource in Resource::ALL {
        h.client.fetch(resource).await.unwrap();
        h.client.fetch(resource).await.unwrap();
    }
    assert_eq!(h.upstream.calls(), 4);

    h.clock.advance(Duration::minutes(15));
    h.client.fetch(Resource::Services).await.unwrap();
    assert_eq!(h.upstream.calls(), 5);
}

#[tokio::test]
async fn cached_records_come_back_unchanged_until_expiry() {
    let h = harness();
    let records = vec![json!({"id": 1, "name": "Dorpskerk"}), json!({"id": 2, "extra": [1, 2]})];
    h.cache.set("roundtrip", records.clone(), Duration::minutes(5));

    h.clock.advance(Duration::minutes(4));
    assert_eq!(h.cache.get("roundtrip"), Some(records));

    h.clock.advance(Duration::minutes(1));
    assert_eq!(h.cache.get("roundtrip"), None);
}

#[tokio::test]
async fn clear_forces_fresh_fetch_for_every_resource() {
    let h = harness();
    for resource in Resource::ALL {
        h.client.fetch(resource).await.unwrap();
    }
    assert!(h.client.clear_cache());
    for resource in Resource::ALL {
        h.client.fetch(resource).await.unwrap();
    }
    assert_eq!(h.upstream.calls(), 8);
}

#[tokio::test]
async fn lookup_maps_swallow_every_failure_kind() {
    let failures = [
        Reply::Offline,
        Reply::Status(401, "Unauthorized"),
        Reply::Body("[]"),
        Reply::Body("<html>"),
    ];
    for reply in failures {
        let h = harness();
        h.upstream.set("preachers", reply);
        assert!(h.client.preacher_lookup_by_id().await.is_empty());
        assert!(h.client.preacher_lookup_by_service_id().await.is_empty());
        assert!(matches!(h.client.fetch_status(), FetchStatus::Failed { .. }));
    }

    let unconfigured = KerkPointClient::with_parts(
        &Config::default(),
        FakeUpstream::new(),
        Arc::new(MemoryCache::new()),
        Arc::new(ManualClock::new(Utc::now())),
    );
    assert!(unconfigured.preacher_lookup_by_id().await.is_empty());
}

#[tokio::test]
async fn lookup_maps_accept_string_ids() {
    let h = harness();
    let by_id = h.client.preacher_lookup_by_id().await;
    assert_eq!(by_id.get(&PreacherId(101)).map(String::as_str), Some("Prop. K. de Boer"));

    let by_service = h.client.preacher_lookup_by_service_id().await;
    assert_eq!(by_service.get(&ServiceId(10)).map(String::as_str), Some("Ds. J. Jansen"));
}

#[tokio::test]
async fn widgets_render_from_one_upstream_round() {
    let h = harness();
    let ctx = ctx(Audience::Visitor);

    let next = display::next_services(&h.client, &ctx).await;
    let next = next.ready().expect("next services");
    assert_eq!(next.heading, "zondag 02-06-2024");
    let columns: Vec<_> = next.columns.iter().map(|c| c.building.as_str()).collect();
    assert_eq!(columns, vec!["Dorpskerk", "Ontmoetingscentrum"]);
    assert_eq!(next.columns[1].rows[0].preacher, "Prop. K. de Boer");

    let overview = display::services_overview(&h.client, &ctx, Some(7)).await;
    let overview = overview.ready().expect("overview");
    let dorpskerk: Vec<_> = overview.columns[0].rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dorpskerk, vec!["26-05-2024", "02-06-2024"]);

    let goals = display::collection_goals(&h.client, &ctx, None).await;
    let names: Vec<_> = goals.ready().unwrap().rows.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["Zending"]);

    assert_eq!(h.upstream.calls(), 4, "widgets share cached resources");
}

#[tokio::test]
async fn operators_see_upstream_errors() {
    let h = harness();
    h.upstream.set("services", Reply::Status(403, "Forbidden"));

    let visitor = display::services_overview(&h.client, &ctx(Audience::Visitor), None).await;
    assert_eq!(visitor, Widget::Failed("Er kon geen dienstenoverzicht worden opgehaald.".into()));

    let operator = display::next_services(&h.client, &ctx(Audience::Operator)).await;
    assert_eq!(operator, Widget::Failed("ADMIN OPMERKING: API Error (403): Forbidden".into()));
}

#[tokio::test]
async fn admin_clear_records_audit_timestamp() {
    let h = harness();
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("kerkpoint").join("settings.json"));
    let admin = CacheAdmin::new(h.client.clone(), store.clone());

    h.client.fetch(Resource::Services).await.unwrap();
    h.clock.advance(Duration::minutes(3));

    let operator = Operator::manager("koster");
    let token = admin.issue_clear_token(&operator).unwrap();
    admin.clear_cache(&operator, &token).unwrap();

    let saved = store.load().unwrap();
    assert_eq!(saved.cache_last_cleared, Some(Utc.with_ymd_and_hms(2024, 6, 1, 7, 3, 0).unwrap()));

    h.client.fetch(Resource::Services).await.unwrap();
    assert_eq!(h.upstream.calls(), 2);
}

#[tokio::test]
async fn year_long_cache_duration_survives_fetch() {
    let settings = SettingsForm {
        api_url: "https://kerkpoint.example.nl".into(),
        api_token: "t0ken".into(),
        cache_duration: MAX_TTL_MINUTES.to_string(),
        rss_playlist_id: String::new(),
    }
    .sanitize(&Settings::default())
    .unwrap();

    let upstream = FakeUpstream::new();
    let client = KerkPointClient::with_parts(
        &Config::from_settings(&settings),
        Arc::clone(&upstream) as Arc<dyn Transport>,
        Arc::new(MemoryCache::new()),
        Arc::new(ManualClock::new(Utc::now())),
    );
    client.fetch(Resource::Services).await.unwrap();
    client.fetch(Resource::Services).await.unwrap();
    assert_eq!(upstream.calls(), 1);
}
