//! Bike-Sharing Usage Dashboard
//!
//! Opens the interactive dashboard, or runs the `export` / `summary` commands headless.

use anyhow::{anyhow, Context};
use bike_share_dashboard::cli::{run_export, run_summary, Cli, Commands};
use bike_share_dashboard::dashboard::Dashboard;
use bike_share_dashboard::data::{DataLoader, Dataset};
use bike_share_dashboard::gui::DashboardApp;
use clap::Parser;
use eframe::egui;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    cli.check_range()?;
    let loader = DataLoader::new(&cli.data);

    match &cli.command {
        Some(Commands::Export { out, width, height }) => {
            let (dataset, _) = loader
                .load()
                .with_context(|| format!("Failed to load {}", loader.file_path().display()))?;
            let range = cli.resolve_range(dataset.date_bounds())?;
            let dashboard = Dashboard::new(dataset);
            let summary = run_export(&dashboard, range.as_ref(), out.clone(), *width, *height)?;
            info!(
                rows = summary.rows,
                rendered = summary.rendered,
                warned = summary.warned,
                "Charts exported"
            );
        }
        Some(Commands::Summary { pretty }) => {
            let (dataset, _) = loader
                .load()
                .with_context(|| format!("Failed to load {}", loader.file_path().display()))?;
            let range = cli.resolve_range(dataset.date_bounds())?;
            let dashboard = Dashboard::new(dataset);
            println!("{}", run_summary(&dashboard, range.as_ref(), *pretty)?);
        }
        None => {
            let (dataset, load_error) = match loader.load() {
                Ok((dataset, _)) => (dataset, None),
                Err(e) => {
                    error!(path = %loader.file_path().display(), "Failed to load dataset: {}", e);
                    (Dataset::empty(), Some(format!("{}: {}", loader.file_path().display(), e)))
                }
            };
            let range = cli.resolve_range(dataset.date_bounds())?;
            let dashboard = Dashboard::new(dataset);

            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1400.0, 900.0])
                    .with_min_inner_size([1000.0, 700.0])
                    .with_title("Bike Sharing Dashboard"),
                ..Default::default()
            };

            eframe::run_native(
                "Bike Sharing Dashboard",
                options,
                Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dashboard, range, load_error)))),
            )
            .map_err(|e| anyhow!("Failed to run the dashboard window: {}", e))?;
        }
    }

    Ok(())
}
