//! Configuration schema definitions using serde.
//!
//! Every section is `#[serde(default)]`, so a file only needs to name the
//! values it overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tsviz_common::VisualizerError;

/// Main configuration structure for tsviz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data source configuration.
    pub data: DataConfig,
    /// Output file configuration.
    pub output: OutputConfig,
    /// Per-chart configuration.
    pub charts: ChartsConfig,
    /// Shared styling.
    pub style: StyleConfig,
}

/// Data source and outlier band configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the `date,value` CSV file.
    pub source: PathBuf,
    /// Lower quantile of the outlier band, exclusive.
    pub lower_quantile: f64,
    /// Upper quantile of the outlier band, exclusive.
    pub upper_quantile: f64,
}

/// Where chart images are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the images are written to.
    pub directory: PathBuf,
    /// File name of the line chart.
    pub line_file: String,
    /// File name of the bar chart.
    pub bar_file: String,
    /// File name of the box plots.
    pub box_file: String,
}

impl OutputConfig {
    /// Full path of the line chart image.
    pub fn line_path(&self) -> PathBuf {
        self.directory.join(&self.line_file)
    }

    /// Full path of the bar chart image.
    pub fn bar_path(&self) -> PathBuf {
        self.directory.join(&self.bar_file)
    }

    /// Full path of the box plot image.
    pub fn box_path(&self) -> PathBuf {
        self.directory.join(&self.box_file)
    }
}

/// Per-chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Daily line chart.
    pub line: LineChartConfig,
    /// Monthly average bar chart.
    pub bar: BarChartConfig,
    /// Year and month box plots.
    pub box_plot: BoxPlotConfig,
}

/// Daily line chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartConfig {
    /// Chart title.
    pub title: String,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Line color as `#RRGGBB`.
    pub line_color: String,
    /// X axis tick placement.
    pub ticks: TickConfig,
}

/// X axis tick placement for the line chart.
///
/// Ticks sit on the records at `start_index + i * stride` for `i` in
/// `0..count`, followed by one tick `trailing_days` after the last of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Index of the first tick record.
    pub start_index: usize,
    /// Records between consecutive ticks.
    pub stride: usize,
    /// Number of record ticks.
    pub count: usize,
    /// Days between the last record tick and the trailing tick.
    pub trailing_days: i64,
    /// `strftime` format of the tick labels.
    pub format: String,
}

/// Monthly average bar chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    /// Optional chart title.
    pub title: Option<String>,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Legend title.
    pub legend_title: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Box plot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotConfig {
    /// Title of the year-grouped panel.
    pub year_title: String,
    /// Title of the month-grouped panel.
    pub month_title: String,
    /// X axis description of the year panel.
    pub year_x_label: String,
    /// X axis description of the month panel.
    pub month_x_label: String,
    /// Y axis description of both panels.
    pub y_label: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Named color schemes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Ten-color categorical palette.
    Default,
    /// Twelve pastel colors.
    Set3,
    /// Shades of gray.
    Monochrome,
    /// Explicit `#RRGGBB` list.
    Custom(Vec<String>),
}

/// Styling shared by all charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color as `#RRGGBB`.
    pub background: String,
    /// Palette used for bars and boxes.
    pub color_scheme: ColorScheme,
    /// Font family for all text.
    pub font_family: String,
    /// Caption font size.
    pub title_font_size: u32,
    /// Axis and legend font size.
    pub label_font_size: u32,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), VisualizerError> {
        let data = &self.data;
        if !(0.0..=1.0).contains(&data.lower_quantile) || !(0.0..=1.0).contains(&data.upper_quantile) {
            return Err(VisualizerError::config(format!(
                "quantiles must lie in [0, 1], got {} and {}",
                data.lower_quantile, data.upper_quantile
            )));
        }
        if data.lower_quantile >= data.upper_quantile {
            return Err(VisualizerError::config(format!(
                "lower quantile {} must be below upper quantile {}",
                data.lower_quantile, data.upper_quantile
            )));
        }
        if data.source.as_os_str().is_empty() {
            return Err(VisualizerError::config("data source path cannot be empty"));
        }

        let output = &self.output;
        for (name, file) in [
            ("line_file", &output.line_file),
            ("bar_file", &output.bar_file),
            ("box_file", &output.box_file),
        ] {
            if file.trim().is_empty() {
                return Err(VisualizerError::config(format!("output.{name} cannot be empty")));
            }
        }

        let charts = &self.charts;
        for (name, width, height) in [
            ("line", charts.line.width, charts.line.height),
            ("bar", charts.bar.width, charts.bar.height),
            ("box_plot", charts.box_plot.width, charts.box_plot.height),
        ] {
            if width == 0 || height == 0 {
                return Err(VisualizerError::config(format!(
                    "charts.{name} dimensions must be non-zero, got {width}x{height}"
                )));
            }
        }
        if charts.line.ticks.stride == 0 {
            return Err(VisualizerError::config("charts.line.ticks.stride must be non-zero"));
        }

        let mut colors = vec![&self.style.background, &charts.line.line_color];
        if let ColorScheme::Custom(custom) = &self.style.color_scheme {
            if custom.is_empty() {
                return Err(VisualizerError::config("custom color scheme cannot be empty"));
            }
            colors.extend(custom);
        }
        if let Some(bad) = colors.into_iter().find(|c| !is_hex_color(c)) {
            return Err(VisualizerError::config(format!("invalid color '{bad}', expected #RRGGBB")));
        }

        Ok(())
    }
}

/// Whether `value` is a `#RRGGBB` color.
pub fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}
