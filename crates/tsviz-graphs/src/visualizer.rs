//! The page view visualization pipeline.
//!
//! A [`Visualizer`] loads its source file once, filters it once against the
//! percentile band, and then serves the three chart operations. Every chart
//! works on its own copy of the filtered dataset.

use crate::aggregator::MonthlyTable;
use crate::calendar::bucket;
use crate::dataset::Dataset;
use crate::figure::{BarChart, BoxPlots, Figure, FigureContent, LineChart};
use crate::filter::{OutlierFilter, PercentileBand};
use crate::renderer::{BitmapRenderer, FigureRenderer};
use std::path::Path;
use tracing::{info, instrument};
use tsviz_common::{format_year_month, Result};
use tsviz_config::{Config, ConfigValidator};

/// Filtered page views plus the configuration and renderer for charting them.
#[derive(Debug)]
pub struct Visualizer<R: FigureRenderer = BitmapRenderer> {
    config: Config,
    dataset: Dataset,
    band: Option<PercentileBand>,
    loaded: usize,
    renderer: R,
}

impl Visualizer<BitmapRenderer> {
    /// Loads `config.data.source` and renders with the bitmap backend.
    pub fn from_config(config: Config) -> Result<Self> {
        let renderer = BitmapRenderer::new(config.style.clone());
        Self::with_renderer(config, renderer)
    }

    /// Loads `path` with the default configuration.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Config::default();
        config.data.source = path.as_ref().to_path_buf();
        Self::from_config(config)
    }
}

impl<R: FigureRenderer> Visualizer<R> {
    /// Loads `config.data.source` and renders with `renderer`.
    pub fn with_renderer(config: Config, renderer: R) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        let dataset = Dataset::from_path(&config.data.source)?;
        Self::from_dataset(dataset, config, renderer)
    }

    /// Builds the pipeline from records already in memory.
    #[instrument(skip_all, fields(records = dataset.len()))]
    pub fn from_dataset(dataset: Dataset, config: Config, renderer: R) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        if let (Some(first), Some(last)) = (dataset.first(), dataset.last()) {
            info!(
                "Loaded {} records from {} to {}",
                dataset.len(),
                format_year_month(first.date),
                format_year_month(last.date)
            );
        }

        let filter = OutlierFilter::new(config.data.lower_quantile, config.data.upper_quantile)?;
        let outcome = filter.apply(&dataset);

        Ok(Self {
            config,
            dataset: outcome.dataset,
            band: outcome.band,
            loaded: dataset.len(),
            renderer,
        })
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The filtered dataset.
    pub const fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Band the source records were filtered against.
    pub const fn band(&self) -> Option<PercentileBand> {
        self.band
    }

    /// Number of records read before filtering.
    pub const fn loaded_len(&self) -> usize {
        self.loaded
    }

    /// The renderer charts are drawn with.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Prepares the line chart without rendering it.
    pub fn line_figure(&self) -> Result<Figure> {
        let working = self.dataset.clone();
        let line = &self.config.charts.line;
        Ok(Figure {
            path: self.config.output.line_path(),
            width: line.width,
            height: line.height,
            content: FigureContent::Line(LineChart::prepare(&working, line)?),
        })
    }

    /// Prepares the bar chart without rendering it.
    pub fn bar_figure(&self) -> Result<Figure> {
        let working = self.dataset.clone();
        let bar = &self.config.charts.bar;
        Ok(Figure {
            path: self.config.output.bar_path(),
            width: bar.width,
            height: bar.height,
            content: FigureContent::Bar(BarChart::prepare(MonthlyTable::from_dataset(&working), bar)?),
        })
    }

    /// Prepares the box plots without rendering them.
    pub fn box_figure(&self) -> Result<Figure> {
        let working = self.dataset.clone();
        let box_plot = &self.config.charts.box_plot;
        Ok(Figure {
            path: self.config.output.box_path(),
            width: box_plot.width,
            height: box_plot.height,
            content: FigureContent::Box(BoxPlots::prepare(&bucket(&working), box_plot)?),
        })
    }

    /// Draws the daily line chart and returns it.
    #[instrument(skip(self))]
    pub fn draw_line_plot(&self) -> Result<Figure> {
        self.render(self.line_figure()?)
    }

    /// Draws the monthly average bar chart and returns it.
    #[instrument(skip(self))]
    pub fn draw_bar_plot(&self) -> Result<Figure> {
        self.render(self.bar_figure()?)
    }

    /// Draws the year and month box plots and returns them.
    #[instrument(skip(self))]
    pub fn draw_box_plot(&self) -> Result<Figure> {
        self.render(self.box_figure()?)
    }

    /// Draws all three charts, stopping at the first failure.
    pub fn draw_all(&self) -> Result<Vec<Figure>> {
        Ok(vec![
            self.draw_line_plot()?,
            self.draw_bar_plot()?,
            self.draw_box_plot()?,
        ])
    }

    fn render(&self, figure: Figure) -> Result<Figure> {
        self.renderer.render_to_file(&figure)?;
        Ok(figure)
    }
}
