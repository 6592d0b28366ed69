//! In-memory chart objects.
//!
//! A [`Figure`] carries everything a renderer draws: every plotted value,
//! tick, label and the output path. Building one never touches the
//! filesystem, so the chart operations can be inspected without re-reading
//! the saved image.

use crate::aggregator::MonthlyTable;
use crate::calendar::{group_by_month, group_by_year, BucketedRecord};
use crate::dataset::Dataset;
use crate::statistics::BoxStats;
use chrono::{Duration, NaiveDate};
use std::fmt::Write;
use std::path::PathBuf;
use tsviz_common::{month_name, Result, VisualizerError, MONTH_ABBREVIATIONS};
use tsviz_config::{BarChartConfig, BoxPlotConfig, LineChartConfig, TickConfig};

/// A prepared chart plus where it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Image output path.
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// What is drawn.
    pub content: FigureContent,
}

/// The three chart kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureContent {
    /// Daily values as one connected line.
    Line(LineChart),
    /// Monthly means grouped by year.
    Bar(BarChart),
    /// Side-by-side year and month box plots.
    Box(BoxPlots),
}

impl Figure {
    /// Short name of the chart kind.
    pub const fn kind(&self) -> &'static str {
        match self.content {
            FigureContent::Line(_) => "line",
            FigureContent::Bar(_) => "bar",
            FigureContent::Box(_) => "box",
        }
    }

    /// The line chart, if this is one.
    pub const fn as_line(&self) -> Option<&LineChart> {
        match &self.content {
            FigureContent::Line(chart) => Some(chart),
            _ => None,
        }
    }

    /// The bar chart, if this is one.
    pub const fn as_bar(&self) -> Option<&BarChart> {
        match &self.content {
            FigureContent::Bar(chart) => Some(chart),
            _ => None,
        }
    }

    /// The box plots, if this is one.
    pub const fn as_box(&self) -> Option<&BoxPlots> {
        match &self.content {
            FigureContent::Box(plots) => Some(plots),
            _ => None,
        }
    }
}

/// A labelled x axis position on the line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Date the tick sits on.
    pub date: NaiveDate,
    /// Rendered label.
    pub label: String,
}

/// Daily page views as a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Chart title.
    pub title: String,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Line color as `#RRGGBB`.
    pub color: String,
    /// `(date, value)` in dataset order.
    pub points: Vec<(NaiveDate, u64)>,
    /// X axis ticks.
    pub ticks: Vec<Tick>,
}

impl LineChart {
    /// Prepares the line chart for `dataset`.
    pub fn prepare(dataset: &Dataset, config: &LineChartConfig) -> Result<Self> {
        if dataset.is_empty() {
            return Err(VisualizerError::render("no records to plot on the line chart"));
        }
        Ok(Self {
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            color: config.line_color.clone(),
            points: dataset.iter().map(|r| (r.date, r.value)).collect(),
            ticks: line_ticks(dataset, &config.ticks)?,
        })
    }

    /// First plotted date.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    /// Last date the x axis must reach, trailing tick included.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let last_point = self.points.iter().map(|(date, _)| *date).max();
        let last_tick = self.ticks.iter().map(|t| t.date).max();
        last_point.max(last_tick)
    }

    /// Days from the first plotted date, the x coordinate of the chart.
    pub fn day_offset(&self, date: NaiveDate) -> f64 {
        self.start_date()
            .map_or(0.0, |start| (date - start).num_days() as f64)
    }

    /// Largest plotted value.
    pub fn max_value(&self) -> u64 {
        self.points.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }
}

/// Ticks on the records at `start_index + i * stride`, then one trailing
/// tick `trailing_days` after the last of them.
///
/// Indices past the end of the dataset are skipped. Without any record tick
/// there is no trailing tick either.
pub fn line_ticks(dataset: &Dataset, config: &TickConfig) -> Result<Vec<Tick>> {
    let records = dataset.records();
    let mut dates: Vec<NaiveDate> = (0..config.count)
        .map_while(|i| config.stride.checked_mul(i)?.checked_add(config.start_index))
        .take_while(|&idx| idx < records.len())
        .map(|idx| records[idx].date)
        .collect();

    if let Some(&last) = dates.last() {
        let trailing = Duration::try_days(config.trailing_days)
            .and_then(|offset| last.checked_add_signed(offset))
            .ok_or_else(|| VisualizerError::render("trailing tick falls outside the calendar"))?;
        dates.push(trailing);
    }

    dates
        .into_iter()
        .map(|date| {
            let mut label = String::new();
            write!(label, "{}", date.format(&config.format)).map_err(|_| {
                VisualizerError::render(format!("invalid tick format '{}'", config.format))
            })?;
            Ok(Tick { date, label })
        })
        .collect()
}

/// One legend entry of the bar chart: a month's bars across the years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarSeries {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Full month name shown in the legend.
    pub label: &'static str,
    /// `(year index, mean)` for every year that has this month.
    pub values: Vec<(usize, u64)>,
}

/// Monthly means, one group per year and one bar per month.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Optional chart title.
    pub title: Option<String>,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// Legend title.
    pub legend_title: String,
    /// The pivoted monthly means.
    pub table: MonthlyTable,
}

impl BarChart {
    /// Prepares the bar chart for a monthly table.
    pub fn prepare(table: MonthlyTable, config: &BarChartConfig) -> Result<Self> {
        if table.is_empty() {
            return Err(VisualizerError::render("no monthly averages to plot on the bar chart"));
        }
        Ok(Self {
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            legend_title: config.legend_title.clone(),
            table,
        })
    }

    /// Group labels, one per year.
    pub fn groups(&self) -> Vec<i32> {
        self.table.years()
    }

    /// Bar series in calendar order, one per month present.
    pub fn series(&self) -> Vec<BarSeries> {
        let years = self.table.years();
        self.table
            .months()
            .into_iter()
            .filter_map(|month| {
                let label = month_name(month)?;
                let values = years
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, &year)| self.table.get(year, month).map(|v| (idx, v)))
                    .collect();
                Some(BarSeries { month, label, values })
            })
            .collect()
    }
}

/// One box of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    /// Index into the panel's categories.
    pub category: usize,
    /// Summary of the category's values.
    pub stats: BoxStats,
}

/// One box-and-whisker panel.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanel {
    /// Panel title.
    pub title: String,
    /// X axis description.
    pub x_label: String,
    /// Y axis description.
    pub y_label: String,
    /// X axis categories, in display order.
    pub categories: Vec<String>,
    /// Boxes for the categories that have data.
    pub boxes: Vec<CategoryBox>,
}

impl BoxPanel {
    /// Label of each drawn box, in order.
    pub fn box_labels(&self) -> Vec<&str> {
        self.boxes
            .iter()
            .filter_map(|b| self.categories.get(b.category).map(String::as_str))
            .collect()
    }

    /// Largest value drawn in the panel.
    pub fn max_value(&self) -> f64 {
        self.boxes
            .iter()
            .map(|b| b.stats.max_drawn())
            .fold(0.0, f64::max)
    }
}

/// Trend (by year) and seasonality (by month) box plots.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlots {
    /// Values grouped by year.
    pub by_year: BoxPanel,
    /// Values grouped by month, January to December.
    pub by_month: BoxPanel,
}

impl BoxPlots {
    /// Prepares both panels from bucketed records.
    pub fn prepare(buckets: &[BucketedRecord], config: &BoxPlotConfig) -> Result<Self> {
        if buckets.is_empty() {
            return Err(VisualizerError::render("no records to summarize in the box plots"));
        }

        let years = group_by_year(buckets);
        let by_year = BoxPanel {
            title: config.year_title.clone(),
            x_label: config.year_x_label.clone(),
            y_label: config.y_label.clone(),
            categories: years.iter().map(|(year, _)| year.to_string()).collect(),
            boxes: years
                .iter()
                .enumerate()
                .filter_map(|(category, (_, values))| {
                    BoxStats::from_values(values).map(|stats| CategoryBox { category, stats })
                })
                .collect(),
        };

        let by_month = BoxPanel {
            title: config.month_title.clone(),
            x_label: config.month_x_label.clone(),
            y_label: config.y_label.clone(),
            categories: MONTH_ABBREVIATIONS.iter().map(ToString::to_string).collect(),
            boxes: group_by_month(buckets)
                .into_iter()
                .filter_map(|(abbrev, values)| {
                    let category = MONTH_ABBREVIATIONS.iter().position(|m| *m == abbrev)?;
                    BoxStats::from_values(&values).map(|stats| CategoryBox { category, stats })
                })
                .collect(),
        };

        Ok(Self { by_year, by_month })
    }
}
