use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod display;
mod error;
mod models;
mod services;
mod utils;

use api::signal::SignalClient;
use config::Config;
use display::{Panel, PngCanvas};
use services::{Dashboard, DashboardSettings, Poller};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    for directive in ["signal_watch=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting signal-watch v{}...", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };
    info!("Polling {} every {:?}", config.api_url, config.poll_interval);

    let client = match SignalClient::new(config.api_url.clone(), config.request_timeout) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };

    let panel = Panel::new(&config.fields, config.echo_panel);
    let canvas = config
        .chart_output
        .clone()
        .map(|path| PngCanvas::new(path, config.chart_width, config.chart_height));
    if let Some(path) = &config.chart_output {
        info!("Drawing price chart to {}", path.display());
    }

    let dashboard = Dashboard::new(
        panel,
        canvas,
        DashboardSettings {
            price_flash: config.price_flash,
            ema_retention: config.ema_retention,
            response_ordering: config.response_ordering,
        },
    );
    let poller = Poller::new(client, dashboard, config.poll_interval, config.retry_delay);

    tokio::select! {
        _ = poller.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down signal-watch");
        }
    }
}
