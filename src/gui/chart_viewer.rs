//! Chart Viewer Widget
//! Central scrollable panel showing the dashboard charts as cards.
//! Cards wrap into as many columns as the available width allows.

use crate::charts::{Chart, ChartKind, ChartPlotter, ChartSink};
use crate::error::Result;
use crate::stats::{StatsCalculator, UsageStats};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CARD_WIDTH: f32 = 640.0;
const PLOT_HEIGHT: f32 = 320.0;

const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);
const BORDER_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

/// One card of the viewer: a drawn chart or the warning replacing it.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Chart(Chart),
    Warning { kind: ChartKind, message: String },
}

impl Panel {
    pub fn kind(&self) -> ChartKind {
        match self {
            Panel::Chart(chart) => chart.kind(),
            Panel::Warning { kind, .. } => *kind,
        }
    }
}

/// Interactive chart sink; holds the panels of the latest refresh.
#[derive(Default)]
pub struct ChartViewer {
    pub panels: Vec<Panel>,
    pub stats: Vec<UsageStats>,
    pub rows: usize,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.panels
            .iter()
            .filter(|p| matches!(p, Panel::Warning { .. }))
            .count()
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        if !self.stats.is_empty() {
            ui.label(
                RichText::new(format!("Hourly usage in selection ({} rows)", self.rows))
                    .size(14.0)
                    .strong(),
            );
            ui.add_space(5.0);
            ChartPlotter::draw_stats_table(ui, &self.stats);
            ui.add_space(CHART_SPACING);
        }

        let avail_width = ui.available_width();
        let num_columns = ((avail_width / (CARD_WIDTH + CHART_SPACING)).floor() as usize).max(1);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in self.panels.chunks(num_columns) {
                    ui.horizontal(|ui| {
                        for panel in row {
                            Self::draw_card(ui, panel);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_card(ui: &mut egui::Ui, panel: &Panel) {
        let kind = panel.kind();
        let border = match panel {
            Panel::Chart(_) => BORDER_COLOR,
            Panel::Warning { .. } => WARNING_COLOR,
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(kind.title()).size(16.0).strong());
                    ui.add_space(8.0);

                    match panel {
                        Panel::Chart(chart) => ChartPlotter::draw_chart(ui, chart, PLOT_HEIGHT),
                        Panel::Warning { message, .. } => {
                            ui.allocate_ui(egui::vec2(CARD_WIDTH - 24.0, PLOT_HEIGHT), |ui| {
                                ui.centered_and_justified(|ui| {
                                    ui.label(
                                        RichText::new(format!("⚠ {}", message))
                                            .size(14.0)
                                            .color(WARNING_COLOR),
                                    );
                                });
                            });
                        }
                    }
                });
            });
    }
}

impl ChartSink for ChartViewer {
    fn begin(&mut self, rows: usize) {
        self.panels.clear();
        self.stats.clear();
        self.rows = rows;
    }

    fn render(&mut self, chart: Chart) -> Result<()> {
        // The table summarizes the same hourly rows as the scatter chart
        if let Chart::TemperatureScatter(records) = &chart {
            self.stats = StatsCalculator::usage_by_day_type(records);
        }
        self.panels.push(Panel::Chart(chart));
        Ok(())
    }

    fn warn(&mut self, kind: ChartKind, message: &str) {
        self.panels.push(Panel::Warning {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClassifiedRecord, DayType, UsageRecord, WeatherCategory};
    use chrono::NaiveDate;

    #[test]
    fn test_begin_clears_previous_refresh() {
        let mut viewer = ChartViewer::new();
        viewer.warn(ChartKind::DailyUsage, "nothing");
        assert_eq!(viewer.warning_count(), 1);

        viewer.begin(12);
        assert!(viewer.panels.is_empty());
        assert_eq!(viewer.rows, 12);
    }

    #[test]
    fn test_scatter_fills_stats_table() {
        let record = UsageRecord {
            date: NaiveDate::from_ymd_opt(2011, 5, 2).unwrap(),
            is_working_day: 0,
            hour: 14,
            daily_count: 300,
            hourly_count: 42,
            temperature: 0.55,
            weather: WeatherCategory::Misty,
        };
        let mut viewer = ChartViewer::new();
        viewer.begin(1);
        viewer
            .render(Chart::TemperatureScatter(vec![ClassifiedRecord {
                record,
                day_type: DayType::Weekend,
            }]))
            .unwrap();

        assert_eq!(viewer.panels.len(), 1);
        assert_eq!(viewer.panels[0].kind(), ChartKind::TemperatureScatter);
        assert_eq!(viewer.stats.len(), 1);
        assert_eq!(viewer.stats[0].max, 42.0);
        assert_eq!(viewer.warning_count(), 0);
    }
}
