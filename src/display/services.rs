use chrono::Datelike;
use std::collections::HashMap;
use std::fmt;

use crate::api::{Building, KerkPointClient, Service};
use crate::constants::display::{DEFAULT_DAYS_AHEAD, TIME_DISPLAY_LEN};
use crate::display::{DisplayContext, Widget};
use crate::locale::Text;
use crate::projection::{
    clamp_days, distinct_locations, group_by_building, next_occurring, parse_date, within_window,
    GroupOrder, ServiceGroup,
};
use crate::projection::schedule::preacher_for;
use crate::types::{BuildingId, ServiceId};

/// One service line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    /// Date formatted for the locale (raw text when it does not parse).
    pub date: String,
    /// Whether this row opens a new date within its column.
    pub show_date: bool,
    /// `HH:MM`.
    pub time: String,
    /// Preacher name or the localized "unknown".
    pub preacher: String,
}

/// Services of one building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingColumn {
    /// Building name or fallback label.
    pub building: String,
    /// Rows in display order.
    pub rows: Vec<ServiceRow>,
}

/// All services inside the look-ahead window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesOverview {
    /// Look-ahead actually used, after clamping.
    pub days_ahead: i64,
    /// One column per building, in first-seen order.
    pub columns: Vec<BuildingColumn>,
}

/// Services of the next day that has any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextServicesView {
    /// Localized weekday and date.
    pub heading: String,
    /// One column per building, rows sorted by start time.
    pub columns: Vec<BuildingColumn>,
}

/// Render every service up to `days_ahead` days from now, grouped by building.
///
/// `days_ahead` defaults to 90; negative values are treated as 0.
pub async fn services_overview(
    client: &KerkPointClient,
    ctx: &DisplayContext,
    days_ahead: Option<i64>,
) -> Widget<ServicesOverview> {
    let days_ahead = clamp_days(days_ahead, DEFAULT_DAYS_AHEAD);

    let services = match client.services().await {
        Ok(services) => services,
        Err(e) => return Widget::Failed(ctx.failure_message(&e, Text::ServicesUnavailable)),
    };
    let preachers = client.preacher_lookup_by_service_id().await;

    let services = within_window(services, ctx.now, days_ahead);
    if services.is_empty() {
        return Widget::Empty(ctx.text(Text::NoServicesInWindow).to_string());
    }

    let buildings = resolve_buildings(client, &services).await;
    let columns = group_by_building(services, &buildings, GroupOrder::DateTime)
        .iter()
        .map(|group| column(ctx, group, &preachers))
        .collect();

    Widget::Ready(ServicesOverview { days_ahead, columns })
}

/// Render the services of the first day, today included, that has any.
pub async fn next_services(client: &KerkPointClient, ctx: &DisplayContext) -> Widget<NextServicesView> {
    let services = match client.services().await {
        Ok(services) => services,
        Err(e) => return Widget::Failed(ctx.failure_message(&e, Text::ServicesUnavailable)),
    };
    let preachers = client.preacher_lookup_by_service_id().await;

    let Some(next) = next_occurring(&services, ctx.now.date()) else {
        return Widget::Empty(ctx.text(Text::NoUpcomingServices).to_string());
    };

    let heading = format!(
        "{} {}",
        ctx.locale.weekday(next.day.weekday()),
        next.day.format(ctx.locale.date_format())
    );
    let buildings = resolve_buildings(client, &next.services).await;
    let columns = group_by_building(next.services, &buildings, GroupOrder::StartTime)
        .iter()
        .map(|group| column(ctx, group, &preachers))
        .collect();

    Widget::Ready(NextServicesView { heading, columns })
}

/// Look up each referenced building once.
async fn resolve_buildings(client: &KerkPointClient, services: &[Service]) -> HashMap<BuildingId, Building> {
    let mut buildings = HashMap::new();
    for id in distinct_locations(services) {
        if let Some(building) = client.building_by_id(id).await {
            buildings.insert(id, building);
        }
    }
    buildings
}

fn column(ctx: &DisplayContext, group: &ServiceGroup, preachers: &HashMap<ServiceId, String>) -> BuildingColumn {
    let mut last_date: Option<&str> = None;
    let rows = group.services.iter()
        .map(|service| {
            let raw_date = service.date.as_deref().unwrap_or_default();
            let show_date = last_date != Some(raw_date);
            last_date = Some(raw_date);
            ServiceRow {
                date: format_date(ctx, raw_date),
                show_date,
                time: display_time(service.start_time.as_deref()),
                preacher: preacher_for(service, preachers)
                    .unwrap_or(ctx.text(Text::Unknown))
                    .to_string(),
            }
        })
        .collect();

    BuildingColumn { building: ctx.building_label(&group.label), rows }
}

fn format_date(ctx: &DisplayContext, raw: &str) -> String {
    parse_date(raw).map_or_else(
        || raw.to_string(),
        |when| when.format(ctx.locale.date_format()).to_string(),
    )
}

/// First five characters of the start time.
fn display_time(raw: Option<&str>) -> String {
    raw.unwrap_or_default().chars().take(TIME_DISPLAY_LEN).collect()
}

fn write_columns(f: &mut fmt::Formatter<'_>, columns: &[BuildingColumn], with_dates: bool) -> fmt::Result {
    for column in columns {
        writeln!(f, "\n{}", column.building)?;
        for row in &column.rows {
            if with_dates {
                let date = if row.show_date { row.date.as_str() } else { "" };
                writeln!(f, "  {date:<12} {:<5}  {}", row.time, row.preacher)?;
            } else {
                writeln!(f, "  {} - {}", row.time, row.preacher)?;
            }
        }
    }
    Ok(())
}

impl fmt::Display for ServicesOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_columns(f, &self.columns, true)
    }
}

impl fmt::Display for NextServicesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        write_columns(f, &self.columns, false)
    }
}
