//! Command-line interface
//! Arguments for the window and the headless `export` / `summary` commands.

use crate::charts::PngExporter;
use crate::dashboard::{Dashboard, RefreshSummary};
use crate::data::{DateRange, ProcessorError};
use crate::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_DATA_PATH: &str = "combined_data.csv";

#[derive(Parser, Debug)]
#[command(name = "bike_share_dashboard")]
#[command(about = "Bike-sharing usage dashboard with date filtering and descriptive charts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, default_value = DEFAULT_DATA_PATH, help = "Combined daily/hourly CSV file")]
    pub data: PathBuf,

    #[arg(long, global = true, value_parser = parse_date, help = "First date of the range (YYYY-MM-DD)")]
    pub start: Option<NaiveDate>,

    #[arg(long, global = true, value_parser = parse_date, help = "Last date of the range (YYYY-MM-DD)")]
    pub end: Option<NaiveDate>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the four charts as PNG files
    Export {
        #[arg(short, long, help = "Output directory")]
        out: PathBuf,

        #[arg(long, default_value_t = PngExporter::DEFAULT_WIDTH)]
        width: u32,

        #[arg(long, default_value_t = PngExporter::DEFAULT_HEIGHT)]
        height: u32,
    },

    /// Print aggregates and statistics for the range as JSON
    Summary {
        #[arg(long, help = "Pretty-print the JSON")]
        pretty: bool,
    },
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", value, e))
}

impl Cli {
    /// Reject `--start` after `--end` before any data is read.
    pub fn check_range(&self) -> std::result::Result<(), ProcessorError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            DateRange::new(start, end)?;
        }
        Ok(())
    }

    /// Range requested on the command line, a missing bound taken from `bounds`.
    ///
    /// `None` when neither bound was given, meaning the whole dataset.
    pub fn resolve_range(
        &self,
        bounds: Option<(NaiveDate, NaiveDate)>,
    ) -> std::result::Result<Option<DateRange>, ProcessorError> {
        let (start, end) = match (self.start, self.end, bounds) {
            (None, None, _) => return Ok(None),
            (Some(start), Some(end), _) => (start, end),
            (Some(start), None, Some((_, max))) => (start, max),
            (None, Some(end), Some((min, _))) => (min, end),
            (Some(date), None, None) | (None, Some(date), None) => (date, date),
        };
        DateRange::new(start, end).map(Some)
    }
}

/// Run the pipeline headless and write one PNG per non-empty chart.
pub fn run_export(
    dashboard: &Dashboard,
    range: Option<&DateRange>,
    out: PathBuf,
    width: u32,
    height: u32,
) -> Result<RefreshSummary> {
    let mut exporter = PngExporter::new(out).with_size(width, height);
    let summary = dashboard.refresh(range, &mut exporter)?;
    info!(
        out_dir = %exporter.out_dir().display(),
        written = exporter.written().len(),
        warnings = exporter.warnings().len(),
        "Export finished"
    );
    Ok(summary)
}

/// JSON report of the selection.
pub fn run_summary(dashboard: &Dashboard, range: Option<&DateRange>, pretty: bool) -> Result<String> {
    let report = dashboard.report(range)?;
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, UsageRecord, WeatherCategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bounds() -> Option<(NaiveDate, NaiveDate)> {
        Some((date(2011, 1, 1), date(2012, 12, 31)))
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bike_share_dashboard"]).unwrap();
        assert_eq!(cli.data, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.resolve_range(bounds()).unwrap(), None);
    }

    #[test]
    fn test_lone_bound_is_completed_from_dataset() {
        let cli = Cli::try_parse_from(["bike_share_dashboard", "--start", "2012-06-01"]).unwrap();
        let range = cli.resolve_range(bounds()).unwrap().unwrap();
        assert_eq!(range.start(), date(2012, 6, 1));
        assert_eq!(range.end(), date(2012, 12, 31));

        let cli = Cli::try_parse_from(["bike_share_dashboard", "--end", "2011-02-01"]).unwrap();
        let range = cli.resolve_range(bounds()).unwrap().unwrap();
        assert_eq!(range.start(), date(2011, 1, 1));
        assert_eq!(range.end(), date(2011, 2, 1));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let cli = Cli::try_parse_from([
            "bike_share_dashboard",
            "--start",
            "2012-06-01",
            "--end",
            "2012-05-01",
        ])
        .unwrap();
        assert!(matches!(
            cli.check_range(),
            Err(ProcessorError::InvalidDateRange { .. })
        ));
        assert!(cli.resolve_range(bounds()).is_err());
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        assert!(Cli::try_parse_from(["bike_share_dashboard", "--start", "01/06/2012"]).is_err());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["bike_share_dashboard", "export", "--out", "charts"]).unwrap();
        match cli.command {
            Some(Commands::Export { out, width, height }) => {
                assert_eq!(out, PathBuf::from("charts"));
                assert_eq!(width, PngExporter::DEFAULT_WIDTH);
                assert_eq!(height, PngExporter::DEFAULT_HEIGHT);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "bike_share_dashboard",
            "summary",
            "--pretty",
            "--data",
            "other.csv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Summary { pretty: true })));
        assert_eq!(cli.data, PathBuf::from("other.csv"));
    }

    #[test]
    fn test_summary_json() {
        let dashboard = Dashboard::new(Dataset::from_records(vec![UsageRecord {
            date: date(2011, 1, 3),
            is_working_day: 1,
            hour: 7,
            daily_count: 1349,
            hourly_count: 76,
            temperature: 0.2,
            weather: WeatherCategory::Clear,
        }]));
        let json = run_summary(&dashboard, None, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"], 1);
        assert_eq!(value["daily"][0]["total"], 1349);
        assert_eq!(value["hourly"][0]["day_type"], "Working Day");
    }

    #[test]
    fn test_export_of_empty_selection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_export(
            &Dashboard::new(Dataset::empty()),
            None,
            dir.path().join("charts"),
            320,
            240,
        )
        .unwrap();
        assert_eq!(summary.warned, 4);
        assert_eq!(summary.rendered, 0);
        assert!(!dir.path().join("charts").exists());
    }
}
