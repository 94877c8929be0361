//! Chart Plotter Module
//! Draws the dashboard charts interactively using egui_plot.

use crate::charts::{
    box_position, day_type_color, integer_label, Chart, ChartKind, Rgb, BAR_PALETTE, BOX_PALETTE, BOX_WIDTH,
    LINE_PALETTE, SCATTER_ALPHA, SCATTER_PALETTE,
};
use crate::data::{ClassifiedRecord, DayType, WeatherCategory};
use crate::stats::{DailyUsage, HourlyUsage, StatsCalculator, UsageStats};
use egui::{Color32, RichText};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

pub fn color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Creates the interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any chart with its axis labels.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &Chart, height: f32) {
        match chart {
            Chart::DailyUsage(rows) => Self::draw_daily_usage(ui, rows, height),
            Chart::HourlyUsage(rows) => Self::draw_hourly_usage(ui, rows, height),
            Chart::TemperatureScatter(records) => {
                Self::draw_temperature_scatter(ui, records, height)
            }
            Chart::WeatherDistribution(records) => {
                Self::draw_weather_distribution(ui, records, height)
            }
        }
    }

    /// Bar chart: total count per working-day flag.
    pub fn draw_daily_usage(ui: &mut egui::Ui, rows: &[DailyUsage], height: f32) {
        let bars: Vec<Bar> = rows
            .iter()
            .map(|row| {
                let label = DayType::from_flag(row.is_working_day)
                    .map(|dt| dt.label())
                    .unwrap_or("Unknown");
                Bar::new(f64::from(row.is_working_day), row.total as f64)
                    .name(label)
                    .width(0.6)
                    .fill(color32(BAR_PALETTE[usize::from(row.is_working_day.min(1))]))
            })
            .collect();

        Plot::new(ChartKind::DailyUsage.file_stem())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(ChartKind::DailyUsage.x_label())
            .y_axis_label(ChartKind::DailyUsage.y_label())
            .legend(Legend::default())
            .include_x(-0.5)
            .include_x(1.5)
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| {
                integer_label(mark.value, |v| {
                    let flag = u8::try_from(v).ok()?;
                    Some(DayType::from_flag(flag).ok()?.label().to_string())
                })
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Total Bike Usage"));
            });
    }

    /// Line chart with markers: mean hourly count per day type.
    pub fn draw_hourly_usage(ui: &mut egui::Ui, rows: &[HourlyUsage], height: f32) {
        Plot::new(ChartKind::HourlyUsage.file_stem())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(ChartKind::HourlyUsage.x_label())
            .y_axis_label(ChartKind::HourlyUsage.y_label())
            .legend(Legend::default())
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| integer_label(mark.value, |v| Some(v.to_string())))
            .show(ui, |plot_ui| {
                for day_type in DayType::ALL {
                    let points: Vec<[f64; 2]> = rows
                        .iter()
                        .filter(|r| r.day_type == day_type)
                        .map(|r| [f64::from(r.hour), r.mean_count])
                        .collect();
                    if points.is_empty() {
                        continue;
                    }

                    let color = color32(day_type_color(&LINE_PALETTE, day_type));
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(day_type.label()),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(4.0)
                            .color(color)
                            .name(day_type.label()),
                    );
                }
            });
    }

    /// Scatter plot: temperature vs hourly count.
    pub fn draw_temperature_scatter(ui: &mut egui::Ui, records: &[ClassifiedRecord], height: f32) {
        Plot::new(ChartKind::TemperatureScatter.file_stem())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(ChartKind::TemperatureScatter.x_label())
            .y_axis_label(ChartKind::TemperatureScatter.y_label())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for day_type in DayType::ALL {
                    let points: PlotPoints = records
                        .iter()
                        .filter(|r| r.day_type == day_type)
                        .map(|r| [r.record.temperature, f64::from(r.record.hourly_count)])
                        .collect();

                    plot_ui.points(
                        Points::new(points)
                            .radius(2.5)
                            .color(
                                color32(day_type_color(&SCATTER_PALETTE, day_type))
                                    .gamma_multiply(SCATTER_ALPHA),
                            )
                            .name(day_type.label()),
                    );
                }
            });
    }

    /// Box plot: hourly count distribution per weather category and day type.
    pub fn draw_weather_distribution(ui: &mut egui::Ui, records: &[ClassifiedRecord], height: f32) {
        let boxes = StatsCalculator::weather_distribution(records);

        Plot::new(ChartKind::WeatherDistribution.file_stem())
            .height(height)
            .allow_scroll(false)
            .x_axis_label(ChartKind::WeatherDistribution.x_label())
            .y_axis_label(ChartKind::WeatherDistribution.y_label())
            .legend(Legend::default())
            .include_x(0.5)
            .include_x(4.5)
            .x_axis_formatter(|mark, _range| {
                integer_label(mark.value, |v| {
                    let weather = WeatherCategory::from_code(u8::try_from(v).ok()?)?;
                    Some(format!("{} ({})", weather.code(), weather.label()))
                })
            })
            .show(ui, |plot_ui| {
                for day_type in DayType::ALL {
                    let color = color32(day_type_color(&BOX_PALETTE, day_type));
                    let mut elems = Vec::new();
                    let mut outliers: Vec<[f64; 2]> = Vec::new();

                    for b in boxes.iter().filter(|b| b.day_type == day_type) {
                        let x = box_position(b.weather.code(), day_type);
                        let s = &b.summary;
                        elems.push(
                            BoxElem::new(
                                x,
                                BoxSpread::new(
                                    s.lower_whisker,
                                    s.q1,
                                    s.median,
                                    s.q3,
                                    s.upper_whisker,
                                ),
                            )
                            .name(format!("{} / {}", b.weather.label(), day_type.label()))
                            .box_width(BOX_WIDTH)
                            .fill(color.gamma_multiply(0.6))
                            .stroke(egui::Stroke::new(1.5, color)),
                        );
                        outliers.extend(s.outliers.iter().map(|&y| [x, y]));
                    }

                    if elems.is_empty() {
                        continue;
                    }
                    plot_ui.box_plot(BoxPlot::new(elems).name(day_type.label()));
                    if !outliers.is_empty() {
                        plot_ui.points(
                            Points::new(PlotPoints::from(outliers))
                                .radius(2.5)
                                .color(color)
                                .name(day_type.label()),
                        );
                    }
                }
            });
    }

    /// Draw statistics table of hourly counts per day type.
    pub fn draw_stats_table(ui: &mut egui::Ui, stats: &[UsageStats]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("usage_stats_table")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Day Type", "N", "Mean", "Median", "Std", "Min", "Max"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for s in stats {
                            let color = color32(day_type_color(&LINE_PALETTE, s.day_type));
                            ui.label(RichText::new(s.day_type.label()).size(11.0).color(color));
                            ui.label(RichText::new(s.count.to_string()).size(11.0));
                            for value in [s.mean, s.median, s.std, s.min, s.max] {
                                ui.label(RichText::new(format!("{:.2}", value)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color32_conversion() {
        assert_eq!(color32((1, 2, 3)), Color32::from_rgb(1, 2, 3));
    }
}
