//! Flaretion - a terminal dashboard for crypto trading signals.

use flaretion::{App, Config, Result, config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout, so logs go to a daily rolling file
    let log_dir = config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "flaretion.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "flaretion=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default()?;

    // Run the application
    let mut app = App::new(config).await?;
    app.run().await?;

    Ok(())
}
