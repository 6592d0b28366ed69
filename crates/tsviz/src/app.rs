//! Application wiring: configuration in, chart images out.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use tsviz_config::{Config, ConfigLoader};
use tsviz_graphs::{Figure, Visualizer};

/// Main application structure.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
}

impl App {
    /// Creates an application from a ready configuration.
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = ConfigLoader::new(path)
            .load_or_default()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        Ok(Self::new(config))
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Loads the data source and draws all three charts.
    pub fn run(&self) -> Result<Vec<Figure>> {
        let source = &self.config.data.source;
        let visualizer = Visualizer::from_config(self.config.clone())
            .with_context(|| format!("failed to prepare page views from {}", source.display()))?;

        info!(
            "Kept {} of {} records for charting",
            visualizer.dataset().len(),
            visualizer.loaded_len()
        );

        let figures = visualizer.draw_all().context("failed to draw charts")?;
        for figure in &figures {
            info!("Wrote {} chart to {}", figure.kind(), figure.path.display());
        }
        Ok(figures)
    }
}
