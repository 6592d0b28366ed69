//! Default values reproducing the reference page view charts.

use crate::schema::*;
use std::path::PathBuf;

/// Default source file name.
pub const DEFAULT_SOURCE: &str = "fcc-forum-pageviews.csv";

/// Default configuration file looked up by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "tsviz.toml";

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            output: OutputConfig::default(),
            charts: ChartsConfig::default(),
            style: StyleConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            lower_quantile: 0.025,
            upper_quantile: 0.975,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            line_file: "line_plot.png".to_string(),
            bar_file: "bar_plot.png".to_string(),
            box_file: "box_plot.png".to_string(),
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            line: LineChartConfig::default(),
            bar: BarChartConfig::default(),
            box_plot: BoxPlotConfig::default(),
        }
    }
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            title: "Daily freeCodeCamp Forum Page Views 5/2016-12/2019".to_string(),
            x_label: "Date".to_string(),
            y_label: "Page Views".to_string(),
            width: 2000,
            height: 500,
            line_color: "#FF0000".to_string(),
            ticks: TickConfig::default(),
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            start_index: 40,
            stride: 180,
            count: 7,
            trailing_days: 180,
            format: "%Y-%m".to_string(),
        }
    }
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            x_label: "Years".to_string(),
            y_label: "Average Page Views".to_string(),
            legend_title: "Months".to_string(),
            width: 2000,
            height: 500,
        }
    }
}

impl Default for BoxPlotConfig {
    fn default() -> Self {
        Self {
            year_title: "Year-wise Box Plot (Trend)".to_string(),
            month_title: "Month-wise Box Plot (Seasonality)".to_string(),
            year_x_label: "Year".to_string(),
            month_x_label: "Month".to_string(),
            y_label: "Page Views".to_string(),
            width: 2000,
            height: 500,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            color_scheme: ColorScheme::Set3,
            font_family: "sans-serif".to_string(),
            title_font_size: 20,
            label_font_size: 14,
        }
    }
}
