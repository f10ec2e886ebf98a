use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use waypoint::cli::{Cli, Command};
use waypoint::config::ConfigStore;
use waypoint::demo::{DemoApp, MockEventService};
use waypoint::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = match cli.config.clone() {
        Some(path) => ConfigStore::open_at(path),
        None => ConfigStore::open(),
    }
    .context("Failed to load configuration")?;
    let config = store.get();

    init_tracing(&config.logging);
    tracing::debug!(path = %store.path().display(), "Configuration loaded");

    let service = Arc::new(MockEventService::new(Duration::from_millis(cli.latency_ms)));
    let app = DemoApp::launch(service, &config).context("Failed to launch demo app")?;

    match cli.command {
        Command::Search { queries } => {
            let home = app.home();
            for query in queries {
                home.search(query);
            }
            app.settle().await;
        }
        Command::Link { urls } => {
            for url in urls {
                if let Err(err) = app.links().handle(&url).await {
                    eprintln!("{url}: {err}");
                }
            }
        }
        Command::Tap { count } => {
            let home = app.home();
            for _ in 0..count {
                home.tap_button();
            }
            app.settle().await;
        }
    }

    let snapshot = serde_json::to_string_pretty(&app.snapshot())
        .context("Failed to serialize app state")?;
    println!("{snapshot}");
    Ok(())
}
