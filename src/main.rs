//! `KerkPoint` - render church widgets from the `KerkPoint` API in the terminal.
//!
//! Usage:
//!   kerkpoint [--admin] collecte
//!   kerkpoint [--admin] diensten [--days N]
//!   kerkpoint [--admin] volgende
//!   kerkpoint rss [--playlist ID] [--max N]
//!   kerkpoint status
//!   kerkpoint clear
//!   kerkpoint configure [--url URL] [--token TOKEN] [--minutes N] [--playlist ID]

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use kerkpoint::admin::{CacheAdmin, Operator};
use kerkpoint::api::KerkPointClient;
use kerkpoint::config::Config;
use kerkpoint::constants::cache::DEFAULT_TTL_SECS;
use kerkpoint::constants::feed::DEFAULT_MAX_ITEMS;
use kerkpoint::display::{self, Audience, DisplayContext};
use kerkpoint::feed::RssFeedSource;
use kerkpoint::settings::{SettingsForm, SettingsStore};

/// Value following `flag` on the command line, if any.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    flag_value(args, flag)
        .map(|raw| raw.parse::<T>().map_err(|_| anyhow::anyhow!("invalid value {raw:?} for {flag}")))
        .transpose()
}

fn operator_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "cli".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kerkpoint=info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let audience = if args.iter().any(|a| a == "--admin") { Audience::Operator } else { Audience::Visitor };
    let command = args.iter()
        .find(|a| !a.starts_with("--"))
        .map_or("volgende", String::as_str);

    let config = Config::load().context("Failed to load configuration")?;
    tracing::debug!("{} {} using {}", config.app_name(), config.app_version(), config.settings_path.display());

    let client = KerkPointClient::new(&config);
    let ctx = DisplayContext::current(audience, config.locale);

    match command {
        "collecte" => print!("{}", display::collection_goals(&client, &ctx, None).await),
        "diensten" => {
            let days = parse_flag::<i64>(&args, "--days")?;
            print!("{}", display::services_overview(&client, &ctx, days).await);
        }
        "volgende" => print!("{}", display::next_services(&client, &ctx).await),
        "rss" => {
            let playlist = flag_value(&args, "--playlist").unwrap_or_else(|| config.rss_playlist_id.clone());
            let max_items = parse_flag::<usize>(&args, "--max")?.unwrap_or(DEFAULT_MAX_ITEMS);
            let source = RssFeedSource::new();
            print!("{}", display::latest_sermons(&source, &ctx, &playlist, max_items).await);
        }
        "status" => {
            let admin = CacheAdmin::new(client, SettingsStore::new(&config.settings_path));
            let dashboard = admin.dashboard(config.locale)?;
            println!("{}", dashboard.last_cleared);
            println!("{}", dashboard.last_fetch);
            println!("Refresh interval: {} min", dashboard.refresh_minutes);
        }
        "clear" => {
            let admin = CacheAdmin::new(client, SettingsStore::new(&config.settings_path));
            let operator = Operator::manager(operator_name());
            let token = admin.issue_clear_token(&operator)?;
            let at = admin.clear_cache(&operator, &token)?;
            println!("{}", config.locale.cache_cleared_at(&at.format(config.locale.timestamp_format()).to_string()));
        }
        "configure" => {
            let store = SettingsStore::new(&config.settings_path);
            let previous = store.load()?;
            let form = SettingsForm {
                api_url: flag_value(&args, "--url").unwrap_or_else(|| previous.api_url.clone()),
                api_token: flag_value(&args, "--token").unwrap_or_else(|| previous.api_token.clone()),
                cache_duration: flag_value(&args, "--minutes").unwrap_or_else(|| {
                    let minutes = if previous.cache_duration > 0 { previous.cache_minutes() } else { DEFAULT_TTL_SECS / 60 };
                    minutes.max(1).to_string()
                }),
                rss_playlist_id: flag_value(&args, "--playlist")
                    .unwrap_or_else(|| previous.rss_playlist_id.clone()),
            };
            let settings = form.sanitize(&previous)?;
            store.save(&settings)
                .with_context(|| format!("Failed to write {}", store.path().display()))?;
            println!("Saved settings to {}", store.path().display());
        }
        other => bail!("unknown command {other:?}; expected collecte, diensten, volgende, rss, status, clear or configure"),
    }

    Ok(())
}
