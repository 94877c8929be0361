//! Static Chart Renderer
//! Writes the dashboard charts as PNG files using plotters.
//!
//! One file per chart, named after [`ChartKind::file_stem`]. Charts whose
//! input is empty produce no file; their warnings are logged and kept.

use crate::charts::{
    box_position, day_type_color, integer_label, Chart, ChartKind, ChartSink, Rgb, BAR_PALETTE, BOX_PALETTE,
    BOX_WIDTH, LINE_PALETTE, SCATTER_ALPHA, SCATTER_PALETTE,
};
use crate::data::{ClassifiedRecord, DayType, WeatherCategory};
use crate::error::{DashboardError, Result};
use crate::stats::{DailyUsage, HourlyUsage, StatsCalculator};
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type DrawResult = std::result::Result<(), Box<dyn Error>>;

const TITLE_FONT: (&str, u32) = ("sans-serif", 26);
const LABEL_FONT: (&str, u32) = ("sans-serif", 16);
const GRID: RGBColor = RGBColor(220, 220, 220);

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Upper y bound with 10% headroom, never zero.
fn y_upper(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Chart sink writing one PNG per rendered chart into a directory.
pub struct PngExporter {
    out_dir: PathBuf,
    width: u32,
    height: u32,
    written: Vec<PathBuf>,
    warnings: Vec<(ChartKind, String)>,
}

impl PngExporter {
    pub const DEFAULT_WIDTH: u32 = 1200;
    pub const DEFAULT_HEIGHT: u32 = 700;

    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            written: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Warnings received in place of charts.
    pub fn warnings(&self) -> &[(ChartKind, String)] {
        &self.warnings
    }

    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.out_dir.join(format!("{}.png", kind.file_stem()))
    }

    fn draw(&self, chart: &Chart, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        match chart {
            Chart::DailyUsage(rows) => Self::draw_daily_usage(&root, rows)?,
            Chart::HourlyUsage(rows) => Self::draw_hourly_usage(&root, rows)?,
            Chart::TemperatureScatter(records) => Self::draw_temperature_scatter(&root, records)?,
            Chart::WeatherDistribution(records) => {
                Self::draw_weather_distribution(&root, records)?
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_daily_usage(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        rows: &[DailyUsage],
    ) -> DrawResult {
        let kind = ChartKind::DailyUsage;
        let max = rows.iter().map(|r| r.total as f64).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5f64..1.5f64, 0f64..y_upper(max))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID)
            .x_labels(5)
            .x_label_formatter(&|x: &f64| {
                integer_label(*x, |v| {
                    let flag = u8::try_from(v).ok()?;
                    Some(DayType::from_flag(flag).ok()?.label().to_string())
                })
            })
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .label_style(LABEL_FONT)
            .draw()?;

        chart.draw_series(rows.iter().map(|row| {
            let x = f64::from(row.is_working_day);
            let color = rgb(BAR_PALETTE[usize::from(row.is_working_day.min(1))]);
            Rectangle::new([(x - 0.3, 0.0), (x + 0.3, row.total as f64)], color.filled())
        }))?;

        Ok(())
    }

    fn draw_hourly_usage(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        rows: &[HourlyUsage],
    ) -> DrawResult {
        let kind = ChartKind::HourlyUsage;
        let max_hour = rows.iter().map(|r| r.hour).max().unwrap_or(0);
        let max = rows.iter().map(|r| r.mean_count).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(0f64..f64::from(max_hour.max(1)), 0f64..y_upper(max))?;

        chart
            .configure_mesh()
            .light_line_style(GRID)
            .x_label_formatter(&|x: &f64| integer_label(*x, |v| Some(v.to_string())))
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .label_style(LABEL_FONT)
            .draw()?;

        for day_type in DayType::ALL {
            let points: Vec<(f64, f64)> = rows
                .iter()
                .filter(|r| r.day_type == day_type)
                .map(|r| (f64::from(r.hour), r.mean_count))
                .collect();
            if points.is_empty() {
                continue;
            }

            let color = rgb(day_type_color(&LINE_PALETTE, day_type));
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(day_type.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 4, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(LABEL_FONT)
            .draw()?;

        Ok(())
    }

    fn draw_temperature_scatter(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        records: &[ClassifiedRecord],
    ) -> DrawResult {
        let kind = ChartKind::TemperatureScatter;
        let (t_min, t_max) = records.iter().fold((f64::MAX, f64::MIN), |(lo, hi), r| {
            (lo.min(r.record.temperature), hi.max(r.record.temperature))
        });
        let (t_min, t_max) = if t_min < t_max {
            (t_min, t_max)
        } else {
            (t_min - 0.5, t_min + 0.5)
        };
        let max = records
            .iter()
            .map(|r| f64::from(r.record.hourly_count))
            .fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(t_min..t_max, 0f64..y_upper(max))?;

        chart
            .configure_mesh()
            .light_line_style(GRID)
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .label_style(LABEL_FONT)
            .draw()?;

        for day_type in DayType::ALL {
            let color = rgb(day_type_color(&SCATTER_PALETTE, day_type));
            chart
                .draw_series(
                    records
                        .iter()
                        .filter(|r| r.day_type == day_type)
                        .map(|r| {
                            Circle::new(
                                (r.record.temperature, f64::from(r.record.hourly_count)),
                                3,
                                color.mix(f64::from(SCATTER_ALPHA)).filled(),
                            )
                        }),
                )?
                .label(day_type.label())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(LABEL_FONT)
            .draw()?;

        Ok(())
    }

    fn draw_weather_distribution(
        root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
        records: &[ClassifiedRecord],
    ) -> DrawResult {
        let kind = ChartKind::WeatherDistribution;
        let boxes = StatsCalculator::weather_distribution(records);
        let max = boxes
            .iter()
            .flat_map(|b| b.summary.outliers.iter().copied().chain([b.summary.upper_whisker]))
            .fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(0.5f64..4.5f64, 0f64..y_upper(max))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID)
            .x_labels(9)
            .x_label_formatter(&|x: &f64| {
                integer_label(*x, |v| {
                    let weather = WeatherCategory::from_code(u8::try_from(v).ok()?)?;
                    Some(weather.label().to_string())
                })
            })
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .label_style(LABEL_FONT)
            .draw()?;

        let half = BOX_WIDTH / 2.0;
        for day_type in DayType::ALL {
            let color = rgb(day_type_color(&BOX_PALETTE, day_type));
            let stroke = BLACK.stroke_width(1);

            for b in boxes.iter().filter(|b| b.day_type == day_type) {
                let x = box_position(b.weather.code(), day_type);
                let s = &b.summary;

                chart.draw_series([
                    Rectangle::new([(x - half, s.q1), (x + half, s.q3)], color.filled()),
                    Rectangle::new([(x - half, s.q1), (x + half, s.q3)], stroke),
                ])?;
                chart.draw_series([
                    PathElement::new(vec![(x - half, s.median), (x + half, s.median)], stroke),
                    PathElement::new(vec![(x, s.q3), (x, s.upper_whisker)], stroke),
                    PathElement::new(vec![(x, s.q1), (x, s.lower_whisker)], stroke),
                    PathElement::new(
                        vec![(x - half / 2.0, s.upper_whisker), (x + half / 2.0, s.upper_whisker)],
                        stroke,
                    ),
                    PathElement::new(
                        vec![(x - half / 2.0, s.lower_whisker), (x + half / 2.0, s.lower_whisker)],
                        stroke,
                    ),
                ])?;
                chart.draw_series(
                    s.outliers
                        .iter()
                        .map(|&y| Circle::new((x, y), 3, BLACK.stroke_width(1))),
                )?;
            }

            // Legend entry only
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
                .label(day_type.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(LABEL_FONT)
            .draw()?;

        Ok(())
    }
}

impl ChartSink for PngExporter {
    fn render(&mut self, chart: Chart) -> Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.path_for(chart.kind());

        self.draw(&chart, &path)
            .map_err(|e| DashboardError::Render(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), "Wrote chart");
        self.written.push(path);
        Ok(())
    }

    fn warn(&mut self, kind: ChartKind, message: &str) {
        warn!(chart = kind.file_stem(), "{}", message);
        self.warnings.push((kind, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_upper_has_headroom() {
        assert_eq!(y_upper(0.0), 1.0);
        assert!((y_upper(100.0) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_for_uses_file_stem() {
        let exporter = PngExporter::new("out").with_size(640, 480);
        assert_eq!(
            exporter.path_for(ChartKind::HourlyUsage),
            Path::new("out").join("hourly_usage.png")
        );
    }

    #[test]
    fn test_warning_is_recorded_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = PngExporter::new(dir.path());
        exporter.warn(ChartKind::DailyUsage, ChartKind::DailyUsage.empty_message());
        assert!(exporter.written().is_empty());
        assert_eq!(exporter.warnings().len(), 1);
        assert!(!exporter.path_for(ChartKind::DailyUsage).exists());
    }
}
