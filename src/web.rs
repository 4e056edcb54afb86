#![cfg(not(tarpaulin_include))]

use brd_dashboard::app;
use brd_dashboard::config::DashboardConfig;

/// Main entry point for the dashboard web service
///
/// Reads `BRD_CONFIG` (optional path to a TOML config file), applies `BRD_*`
/// environment overrides, validates the result and starts the JSON API.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var("BRD_CONFIG") {
        Ok(path) => DashboardConfig::from_file(path)?,
        Err(_) => DashboardConfig::default(),
    }
    .apply_env()?;

    app::run(config).await
}
