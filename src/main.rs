use anyhow::Context;
use std::io;
use weather_trends::{run_menu, Settings, WeatherTrends};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=info (or debug) shows fetch, cache and pipeline progress.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::load().context("Failed to load settings")?;
    let app = WeatherTrends::from_settings(&settings)
        .await
        .context("Failed to set up the weather clients")?;

    let stdin = io::stdin();
    run_menu(&app, stdin.lock(), io::stdout())
        .await
        .context("Menu input failed")?;
    Ok(())
}
