//! Figure rendering trait and the bitmap implementation.

use crate::figure::{BarChart, BoxPanel, BoxPlots, Figure, FigureContent, LineChart};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::io::Cursor;
use tracing::{debug, info, instrument};
use tsviz_common::{Result, VisualizerError};
use tsviz_config::{ColorScheme, StyleConfig};

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 60;
const Y_LABEL_AREA: u32 = 90;
const HEADROOM: f64 = 1.05;
const BOX_HALF_WIDTH: f64 = 0.3;
const GROUP_WIDTH: f64 = 0.8;
const LEGEND_INSET: i32 = 10;
const LEGEND_CAPTION_GAP: i32 = 4;

/// Trait for turning figures into images.
#[cfg_attr(test, mockall::automock)]
pub trait FigureRenderer {
    /// Render a figure to its output path.
    fn render_to_file(&self, figure: &Figure) -> Result<()>;

    /// Render a figure to PNG bytes.
    fn render_to_bytes(&self, figure: &Figure) -> Result<Vec<u8>>;
}

/// Colors of a named scheme.
pub fn palette(scheme: &ColorScheme) -> Vec<RGBColor> {
    match scheme {
        ColorScheme::Default => vec![
            RGBColor(31, 119, 180),  // Blue
            RGBColor(255, 127, 14),  // Orange
            RGBColor(44, 160, 44),   // Green
            RGBColor(214, 39, 40),   // Red
            RGBColor(148, 103, 189), // Purple
            RGBColor(140, 86, 75),   // Brown
            RGBColor(227, 119, 194), // Pink
            RGBColor(127, 127, 127), // Gray
            RGBColor(188, 189, 34),  // Olive
            RGBColor(23, 190, 207),  // Cyan
        ],
        ColorScheme::Set3 => vec![
            RGBColor(141, 211, 199),
            RGBColor(255, 255, 179),
            RGBColor(190, 186, 218),
            RGBColor(251, 128, 114),
            RGBColor(128, 177, 211),
            RGBColor(253, 180, 98),
            RGBColor(179, 222, 105),
            RGBColor(252, 205, 229),
            RGBColor(217, 217, 217),
            RGBColor(188, 128, 189),
            RGBColor(204, 235, 197),
            RGBColor(255, 237, 111),
        ],
        ColorScheme::Monochrome => vec![
            RGBColor(0, 0, 0),       // Black
            RGBColor(64, 64, 64),    // Dark Gray
            RGBColor(128, 128, 128), // Gray
            RGBColor(192, 192, 192), // Light Gray
            RGBColor(224, 224, 224), // Very Light Gray
        ],
        ColorScheme::Custom(colors) => colors.iter().map(|c| parse_color(c)).collect(),
    }
}

/// Parse a `#RRGGBB` string, falling back to black.
pub fn parse_color(color: &str) -> RGBColor {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    BLACK
}

/// Axis label for a categorical position; empty between categories.
pub fn category_label(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

/// Offsets from the plot's upper left corner of the legend caption and of
/// the legend box drawn beneath it.
fn legend_offsets(font_size: u32) -> ((i32, i32), (i32, i32)) {
    let line = i32::try_from(font_size).unwrap_or(i32::MAX / 2);
    let caption = (LEGEND_INSET, LEGEND_INSET);
    let legend = (LEGEND_INSET, LEGEND_INSET.saturating_add(line).saturating_add(LEGEND_CAPTION_GAP));
    (caption, legend)
}

fn pick(colors: &[RGBColor], idx: usize) -> RGBColor {
    if colors.is_empty() {
        BLACK
    } else {
        colors[idx % colors.len()]
    }
}

/// Renders figures with the plotters bitmap backend.
#[derive(Debug, Clone, Default)]
pub struct BitmapRenderer {
    style: StyleConfig,
}

impl BitmapRenderer {
    /// Create a renderer with the given style.
    pub const fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Style applied to every figure.
    pub const fn style(&self) -> &StyleConfig {
        &self.style
    }

    fn title_font(&self) -> FontDesc<'_> {
        (
            self.style.font_family.as_str(),
            f64::from(self.style.title_font_size),
        )
            .into_font()
    }

    fn label_font(&self) -> FontDesc<'_> {
        (
            self.style.font_family.as_str(),
            f64::from(self.style.label_font_size),
        )
            .into_font()
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
        root.fill(&parse_color(&self.style.background))
            .map_err(VisualizerError::render)?;

        match &figure.content {
            FigureContent::Line(chart) => self.draw_line(root, chart)?,
            FigureContent::Bar(chart) => self.draw_bar(root, chart)?,
            FigureContent::Box(plots) => self.draw_boxes(root, plots)?,
        }

        root.present().map_err(VisualizerError::render)?;
        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, chart: &LineChart) -> Result<()> {
        let x_end = chart
            .end_date()
            .map_or(1.0, |end| chart.day_offset(end))
            .max(1.0);
        let y_max = (chart.max_value() as f64 * HEADROOM).max(1.0);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, self.title_font())
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(0f64..x_end, 0f64..y_max)
            .map_err(VisualizerError::render)?;

        // tick labels are drawn below from the prepared ticks
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_: &f64| String::new())
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .label_style(self.label_font())
            .axis_desc_style(self.label_font())
            .draw()
            .map_err(VisualizerError::render)?;

        let grid = RGBColor(220, 220, 220);
        ctx.draw_series(chart.ticks.iter().map(|tick| {
            let x = chart.day_offset(tick.date);
            PathElement::new(vec![(x, 0.0), (x, y_max)], grid)
        }))
        .map_err(VisualizerError::render)?;

        let color = parse_color(&chart.color);
        ctx.draw_series(LineSeries::new(
            chart
                .points
                .iter()
                .map(|&(date, value)| (chart.day_offset(date), value as f64)),
            &color,
        ))
        .map_err(VisualizerError::render)?;

        let tick_style = TextStyle::from(self.label_font()).pos(Pos::new(HPos::Center, VPos::Top));
        for tick in &chart.ticks {
            let (px, py) = ctx.backend_coord(&(chart.day_offset(tick.date), 0.0));
            root.draw(&Text::new(tick.label.as_str(), (px, py + 6), tick_style.clone()))
                .map_err(VisualizerError::render)?;
        }

        debug!("Drew line chart with {} points", chart.points.len());
        Ok(())
    }

    fn draw_bar<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, chart: &BarChart) -> Result<()> {
        let groups: Vec<String> = chart.groups().iter().map(ToString::to_string).collect();
        let series = chart.series();
        let y_max = (chart.table.max_value().unwrap_or(0) as f64 * HEADROOM).max(1.0);
        let x_max = groups.len() as f64 - 0.5;

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA);
        if let Some(title) = &chart.title {
            builder.caption(title, self.title_font());
        }
        let mut ctx = builder
            .build_cartesian_2d(-0.5f64..x_max, 0f64..y_max)
            .map_err(VisualizerError::render)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(groups.len() * 2 + 1)
            .x_label_formatter(&|x: &f64| category_label(&groups, *x))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .label_style(self.label_font())
            .axis_desc_style(self.label_font())
            .draw()
            .map_err(VisualizerError::render)?;

        let colors = palette(&self.style.color_scheme);
        let width = GROUP_WIDTH / series.len().max(1) as f64;

        for (slot, bars) in series.iter().enumerate() {
            let color = pick(&colors, bars.month as usize - 1);
            let offset = -GROUP_WIDTH / 2.0 + slot as f64 * width;
            ctx.draw_series(bars.values.iter().map(|&(group, value)| {
                let x0 = group as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + width, value as f64)], color.filled())
            }))
            .map_err(VisualizerError::render)?
            .label(bars.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        let (caption, legend) = legend_offsets(self.style.label_font_size);
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::Coordinate(legend.0, legend.1))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(self.label_font())
            .draw()
            .map_err(VisualizerError::render)?;

        if !chart.legend_title.is_empty() {
            let (px, py) = ctx.backend_coord(&(-0.5, y_max));
            root.draw(&Text::new(
                chart.legend_title.as_str(),
                (px + caption.0, py + caption.1),
                self.label_font(),
            ))
            .map_err(VisualizerError::render)?;
        }

        debug!("Drew bar chart with {} series over {} groups", series.len(), groups.len());
        Ok(())
    }

    fn draw_boxes<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, plots: &BoxPlots) -> Result<()> {
        let areas = root.split_evenly((1, 2));
        for (area, panel) in areas.iter().zip([&plots.by_year, &plots.by_month]) {
            self.draw_panel(area, panel)?;
        }
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, panel: &BoxPanel) -> Result<()> {
        let y_max = (panel.max_value() * HEADROOM).max(1.0);
        let x_max = panel.categories.len() as f64 - 0.5;

        let mut ctx = ChartBuilder::on(area)
            .caption(&panel.title, self.title_font())
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(-0.5f64..x_max, 0f64..y_max)
            .map_err(VisualizerError::render)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(panel.categories.len() * 2 + 1)
            .x_label_formatter(&|x: &f64| category_label(&panel.categories, *x))
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style(self.label_font())
            .axis_desc_style(self.label_font())
            .draw()
            .map_err(VisualizerError::render)?;

        let colors = palette(&self.style.color_scheme);
        let outline = BLACK.stroke_width(1);

        for entry in &panel.boxes {
            let c = entry.category as f64;
            let stats = &entry.stats;
            let (left, right) = (c - BOX_HALF_WIDTH, c + BOX_HALF_WIDTH);
            let (cap_left, cap_right) = (c - BOX_HALF_WIDTH / 2.0, c + BOX_HALF_WIDTH / 2.0);

            ctx.draw_series([
                Rectangle::new([(left, stats.q1), (right, stats.q3)], pick(&colors, entry.category).filled()),
                Rectangle::new([(left, stats.q1), (right, stats.q3)], outline),
            ])
            .map_err(VisualizerError::render)?;

            ctx.draw_series([
                PathElement::new(vec![(left, stats.median), (right, stats.median)], outline),
                PathElement::new(vec![(c, stats.q3), (c, stats.upper_whisker)], outline),
                PathElement::new(vec![(c, stats.q1), (c, stats.lower_whisker)], outline),
                PathElement::new(
                    vec![(cap_left, stats.upper_whisker), (cap_right, stats.upper_whisker)],
                    outline,
                ),
                PathElement::new(
                    vec![(cap_left, stats.lower_whisker), (cap_right, stats.lower_whisker)],
                    outline,
                ),
            ])
            .map_err(VisualizerError::render)?;

            ctx.draw_series(stats.outliers.iter().map(|&o| Circle::new((c, o), 3, outline)))
                .map_err(VisualizerError::render)?;
        }

        debug!("Drew box panel '{}' with {} boxes", panel.title, panel.boxes.len());
        Ok(())
    }
}

impl FigureRenderer for BitmapRenderer {
    /// Draws into memory first; the output path is only touched once the
    /// figure has rendered completely.
    #[instrument(skip_all, fields(kind = figure.kind(), path = %figure.path.display()))]
    fn render_to_file(&self, figure: &Figure) -> Result<()> {
        let bytes = self.render_to_bytes(figure)?;

        if let Some(parent) = figure.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&figure.path, bytes)?;

        info!("Successfully rendered {} chart to {}", figure.kind(), figure.path.display());
        Ok(())
    }

    fn render_to_bytes(&self, figure: &Figure) -> Result<Vec<u8>> {
        let (width, height) = (figure.width, figure.height);
        if width == 0 || height == 0 {
            return Err(VisualizerError::render(format!("figure size {width}x{height} is empty")));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, figure)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| VisualizerError::render("pixel buffer does not match figure size"))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(VisualizerError::render)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MonthlyTable;
    use crate::dataset::Dataset;
    use tsviz_common::test_utils::pageview_fixtures::daily_records;
    use tsviz_common::test_utils::{create_temp_dir, date};
    use tsviz_config::LineChartConfig;

    #[test]
    fn test_color_schemes() {
        let default_colors = palette(&ColorScheme::Default);
        assert_eq!(default_colors.len(), 10);
        assert_eq!(default_colors[0], RGBColor(31, 119, 180));

        let set3 = palette(&ColorScheme::Set3);
        assert_eq!(set3.len(), 12);
        assert_eq!(set3[0], RGBColor(141, 211, 199));
        assert_eq!(set3[11], RGBColor(255, 237, 111));

        let custom = palette(&ColorScheme::Custom(vec![
            "#FF0000".to_string(),
            "#00FF00".to_string(),
        ]));
        assert_eq!(custom, vec![RGBColor(255, 0, 0), RGBColor(0, 255, 0)]);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(parse_color("#0000FF"), RGBColor(0, 0, 255));
        assert_eq!(parse_color("#ff8000"), RGBColor(255, 128, 0));
        assert_eq!(parse_color("invalid"), BLACK);
        assert_eq!(parse_color("#ZZ0000"), BLACK);
        assert_eq!(parse_color("#ééé"), BLACK);
    }

    #[test]
    fn test_pick_wraps_and_handles_empty() {
        let colors = palette(&ColorScheme::Monochrome);
        assert_eq!(pick(&colors, 5), colors[0]);
        assert_eq!(pick(&[], 3), BLACK);
    }

    #[test]
    fn test_category_label() {
        let labels = vec!["2016".to_string(), "2017".to_string()];
        assert_eq!(category_label(&labels, 0.0), "2016");
        assert_eq!(category_label(&labels, 1.0), "2017");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn test_legend_box_sits_below_caption() {
        let (caption, legend) = legend_offsets(14);
        assert_eq!(caption, (LEGEND_INSET, LEGEND_INSET));
        assert_eq!(legend.0, caption.0);
        assert_eq!(legend.1, caption.1 + 14 + LEGEND_CAPTION_GAP);

        let (_, huge) = legend_offsets(u32::MAX);
        assert!(huge.1 > LEGEND_INSET);
    }

    fn line_figure(path: std::path::PathBuf, width: u32, height: u32) -> Figure {
        let dataset = Dataset::new(daily_records(date(2019, 1, 1), 10, |i| i as u64));
        Figure {
            path,
            width,
            height,
            content: FigureContent::Line(
                LineChart::prepare(&dataset, &LineChartConfig::default()).unwrap(),
            ),
        }
    }

    #[test]
    fn test_failed_render_leaves_no_file() {
        let dir = create_temp_dir();
        let path = dir.path().join("charts").join("line.png");
        let figure = line_figure(path.clone(), 0, 300);

        let result = BitmapRenderer::default().render_to_file(&figure);
        assert!(matches!(result, Err(VisualizerError::Render(_))));
        assert!(!path.exists());
        assert!(!dir.path().join("charts").exists());
    }

    #[test]
    #[ignore = "requires system fonts"]
    fn test_render_to_file_writes_png() {
        let dir = create_temp_dir();
        let path = dir.path().join("nested").join("line.png");

        BitmapRenderer::default()
            .render_to_file(&line_figure(path.clone(), 300, 200))
            .unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_mock_renderer() {
        let mut mock = MockFigureRenderer::new();
        mock.expect_render_to_bytes().returning(|_| Ok(vec![1, 2, 3]));

        let figure = line_figure("line.png".into(), 10, 10);
        assert_eq!(mock.render_to_bytes(&figure).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    #[ignore = "requires system fonts"]
    fn test_render_bar_chart_to_png() {
        let dataset = Dataset::new(daily_records(date(2018, 1, 1), 400, |i| 100 + i as u64));
        let chart = BarChart::prepare(
            MonthlyTable::from_dataset(&dataset),
            &tsviz_config::BarChartConfig::default(),
        )
        .unwrap();
        let figure = Figure {
            path: "bar.png".into(),
            width: 400,
            height: 200,
            content: FigureContent::Bar(chart),
        };

        let bytes = BitmapRenderer::default().render_to_bytes(&figure).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
