//! Control Panel Widget
//! Left side panel with dataset info, the date range selector and export.

use crate::data::{Dataset, DateRange};
use chrono::{Days, NaiveDate};
use egui::{Color32, RichText, Slider};

/// Two linked day offsets from the earliest date; start never passes end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelector {
    min: NaiveDate,
    span: i64,
    start: i64,
    end: i64,
}

impl DateSelector {
    /// Selector over `[min, max]` with the full range selected.
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        let span = (max - min).num_days().max(0);
        Self {
            min,
            span,
            start: 0,
            end: span,
        }
    }

    pub fn from_bounds(bounds: Option<(NaiveDate, NaiveDate)>) -> Option<Self> {
        bounds.map(|(min, max)| Self::new(min, max))
    }

    pub fn min_date(&self) -> NaiveDate {
        self.date_at(0)
    }

    pub fn max_date(&self) -> NaiveDate {
        self.date_at(self.span)
    }

    pub fn date_at(&self, offset: i64) -> NaiveDate {
        let days = u64::try_from(offset.clamp(0, self.span)).unwrap_or(0);
        self.min.checked_add_days(Days::new(days)).unwrap_or(self.min)
    }

    fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.min).num_days().clamp(0, self.span)
    }

    /// Move the start; the end follows when pushed past.
    pub fn set_start(&mut self, offset: i64) {
        self.start = offset.clamp(0, self.span);
        self.end = self.end.max(self.start);
    }

    /// Move the end; the start follows when pushed past.
    pub fn set_end(&mut self, offset: i64) {
        self.end = offset.clamp(0, self.span);
        self.start = self.start.min(self.end);
    }

    /// Select `range`, clamped to the dataset bounds.
    ///
    /// Returns `false` when clamping changed the range.
    pub fn set_range(&mut self, range: &DateRange) -> bool {
        self.start = self.offset_of(range.start());
        self.end = self.offset_of(range.end());
        self.date_at(self.start) == range.start() && self.date_at(self.end) == range.end()
    }

    pub fn reset(&mut self) {
        self.start = 0;
        self.end = self.span;
    }

    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end == self.span
    }

    pub fn selected_range(&self) -> Option<DateRange> {
        DateRange::new(self.date_at(self.start), self.date_at(self.end)).ok()
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub source: String,
    pub rows: usize,
    pub selector: Option<DateSelector>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(dataset: &Dataset) -> Self {
        let source = dataset
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "No data loaded".to_string());

        Self {
            source,
            rows: dataset.len(),
            selector: DateSelector::from_bounds(dataset.date_bounds()),
            status: "Ready".to_string(),
        }
    }

    /// Range shown by the charts; `None` when there is nothing to select from.
    pub fn selected_range(&self) -> Option<DateRange> {
        self.selector.as_ref().and_then(DateSelector::selected_range)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Bike Sharing Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source).size(12.0));
                ui.label(
                    RichText::new(format!("{} rows", self.rows))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if let Some(selector) = &self.selector {
                    ui.label(
                        RichText::new(format!(
                            "{} to {}",
                            selector.min_date(),
                            selector.max_date()
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        match self.selector.as_mut() {
            Some(selector) => {
                let dates = selector.clone();
                let span = selector.span;

                let mut start = selector.start;
                ui.label("Start Date");
                let start_slider = Slider::new(&mut start, 0..=span)
                    .custom_formatter(|v, _| dates.date_at(v as i64).to_string());
                if ui.add(start_slider).changed() {
                    selector.set_start(start);
                    action = ControlPanelAction::RangeChanged;
                }

                let mut end = selector.end;
                ui.label("End Date");
                let end_slider = Slider::new(&mut end, 0..=span)
                    .custom_formatter(|v, _| dates.date_at(v as i64).to_string());
                if ui.add(end_slider).changed() {
                    selector.set_end(end);
                    action = ControlPanelAction::RangeChanged;
                }

                ui.add_space(5.0);
                ui.add_enabled_ui(!selector.is_full(), |ui| {
                    if ui.small_button("↺ Reset Range").clicked() {
                        action = ControlPanelAction::ResetRange;
                    }
                });
            }
            None => {
                ui.label(RichText::new("No dates available").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let export_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(export_button).clicked() {
                action = ControlPanelAction::ExportCharts;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RangeChanged,
    ResetRange,
    ExportCharts,
}
