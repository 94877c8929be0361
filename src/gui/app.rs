//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::PngExporter;
use crate::dashboard::Dashboard;
use crate::data::DateRange;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel};
use tracing::{error, info, warn};

/// Main application window.
///
/// Every range change recomputes the whole pipeline synchronously.
pub struct DashboardApp {
    dashboard: Dashboard,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    load_error: Option<String>,
}

impl DashboardApp {
    pub fn new(
        dashboard: Dashboard,
        initial_range: Option<DateRange>,
        load_error: Option<String>,
    ) -> Self {
        let mut control_panel = ControlPanel::new(dashboard.dataset());
        if let (Some(selector), Some(range)) = (control_panel.selector.as_mut(), initial_range) {
            if !selector.set_range(&range) {
                warn!(
                    start = %range.start(),
                    end = %range.end(),
                    min = %selector.min_date(),
                    max = %selector.max_date(),
                    "Requested range exceeds the dataset; clamped to its dates"
                );
            }
        }

        let mut app = Self {
            dashboard,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_error,
        };
        app.refresh();
        app
    }

    /// Recompute the charts for the selected range.
    fn refresh(&mut self) {
        let range = self.control_panel.selected_range();
        match self.dashboard.refresh(range.as_ref(), &mut self.chart_viewer) {
            Ok(summary) => {
                let status = match range {
                    Some(range) => format!(
                        "{} rows from {} to {}",
                        summary.rows,
                        range.start(),
                        range.end()
                    ),
                    None => format!("{} rows", summary.rows),
                };
                self.control_panel.set_status(status);
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Write the current charts as PNG files into a chosen folder.
    fn handle_export(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Choose export folder")
            .pick_folder()
        else {
            return;
        };

        let range = self.control_panel.selected_range();
        let mut exporter = PngExporter::new(dir);
        match self.dashboard.refresh(range.as_ref(), &mut exporter) {
            Ok(summary) => {
                info!(
                    out_dir = %exporter.out_dir().display(),
                    written = summary.rendered,
                    "Charts exported"
                );
                self.control_panel.set_status(format!(
                    "Exported {} charts to {} ({} skipped)",
                    summary.rendered,
                    exporter.out_dir().display(),
                    summary.warned
                ));
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::RangeChanged => self.refresh(),
                        ControlPanelAction::ResetRange => {
                            if let Some(selector) = self.control_panel.selector.as_mut() {
                                selector.reset();
                            }
                            self.refresh();
                        }
                        ControlPanelAction::ExportCharts => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = &self.load_error {
                egui::Frame::none()
                    .rounding(5.0)
                    .stroke(egui::Stroke::new(2.0, Color32::from_rgb(220, 53, 69)))
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new(format!("❌ Failed to load data: {}", message))
                                .size(16.0)
                                .strong()
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    });
                ui.add_space(10.0);
            }

            self.chart_viewer.show(ui);
        });
    }
}
