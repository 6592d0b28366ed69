//! Main entry point for tsviz.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsviz::App;
use tsviz_config::DEFAULT_CONFIG_FILE;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tsviz=info,tsviz_graphs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tsviz");

    let app = App::from_config_file(DEFAULT_CONFIG_FILE)?;

    if let Err(e) = app.run() {
        error!("Chart generation failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
