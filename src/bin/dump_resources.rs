//! Dump raw KerkPoint API resources for analysis.
//!
//! Usage: cargo run --bin dump_resources [-- --resource services]

use anyhow::{Context, Result};

use kerkpoint::api::{KerkPointClient, Resource};
use kerkpoint::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let only: Option<String> = std::env::args()
        .position(|a| a == "--resource")
        .and_then(|i| std::env::args().nth(i + 1));

    let config = Config::load().context("Failed to load config")?;
    if !config.has_api_credentials() {
        anyhow::bail!("No API URL or token configured; set KERKPOINT_API_URL and KERKPOINT_API_TOKEN");
    }
    let client = KerkPointClient::new(&config);

    let resources: Vec<Resource> = Resource::ALL.iter()
        .copied()
        .filter(|r| only.as_deref().map_or(true, |name| r.path() == name))
        .collect();
    if resources.is_empty() {
        anyhow::bail!("Unknown resource {:?}", only.unwrap_or_default());
    }

    for resource in resources {
        println!("=== {resource} ({}) ===", config.endpoint_url(resource));
        match client.fetch(resource).await {
            Ok(records) => {
                println!("{} records", records.len());
                for (idx, record) in records.iter().enumerate() {
                    println!("  {idx:>3}. {record}");
                }
            }
            Err(e) => eprintln!("  Error fetching {resource}: {e}"),
        }
        println!();
    }

    println!("Fetch status: {}", client.fetch_status_summary(config.locale));
    Ok(())
}
