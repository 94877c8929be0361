//! Dashboard pipeline
//! Filter, classify and aggregate the loaded dataset, then hand each chart
//! to a [`ChartSink`] or warn in its place.

use crate::charts::{Chart, ChartSink};
use crate::data::{ClassifiedRecord, DataProcessor, Dataset, DateRange, UsageRecord};
use crate::error::Result;
use crate::stats::{DailyUsage, HourlyUsage, StatsCalculator, UsageAggregator, UsageStats};
use serde::Serialize;
use tracing::debug;

/// Outcome of one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    /// Records inside the selected range.
    pub rows: usize,
    pub rendered: usize,
    pub warned: usize,
}

/// Aggregated view of a selection, serializable for the `summary` command.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub range: Option<DateRange>,
    pub rows: usize,
    pub daily: Vec<DailyUsage>,
    pub hourly: Vec<HourlyUsage>,
    pub by_day_type: Vec<UsageStats>,
}

/// Owns the immutable dataset and recomputes every view on request.
pub struct Dashboard {
    dataset: Dataset,
}

impl Dashboard {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Records inside `range` (everything when `None`), plain and classified.
    pub fn select(
        &self,
        range: Option<&DateRange>,
    ) -> Result<(Vec<UsageRecord>, Vec<ClassifiedRecord>)> {
        let filtered = match range {
            Some(range) => DataProcessor::filter_by_date(self.dataset.records(), range),
            None => self.dataset.records().to_vec(),
        };
        let classified = DataProcessor::classify(&filtered)?;
        Ok((filtered, classified))
    }

    /// Recompute the four charts for `range` and pass them to `sink`.
    ///
    /// A chart with empty input is never rendered; `sink.warn` receives its
    /// message instead.
    pub fn refresh<S: ChartSink + ?Sized>(
        &self,
        range: Option<&DateRange>,
        sink: &mut S,
    ) -> Result<RefreshSummary> {
        let (filtered, classified) = self.select(range)?;
        let daily = UsageAggregator::daily_usage(&filtered)?;
        let hourly = UsageAggregator::hourly_usage(&classified)?;

        let mut summary = RefreshSummary {
            rows: filtered.len(),
            ..RefreshSummary::default()
        };
        sink.begin(summary.rows);

        let charts = [
            Chart::DailyUsage(daily),
            Chart::HourlyUsage(hourly),
            Chart::TemperatureScatter(classified.clone()),
            Chart::WeatherDistribution(classified),
        ];
        for chart in charts {
            let kind = chart.kind();
            if chart.is_empty() {
                sink.warn(kind, kind.empty_message());
                summary.warned += 1;
            } else {
                sink.render(chart)?;
                summary.rendered += 1;
            }
        }

        debug!(
            rows = summary.rows,
            rendered = summary.rendered,
            warned = summary.warned,
            "Dashboard refreshed"
        );
        Ok(summary)
    }

    /// Aggregates and per-day-type statistics for `range`.
    pub fn report(&self, range: Option<&DateRange>) -> Result<SelectionReport> {
        let (filtered, classified) = self.select(range)?;
        Ok(SelectionReport {
            range: range.copied(),
            rows: filtered.len(),
            daily: UsageAggregator::daily_usage(&filtered)?,
            hourly: UsageAggregator::hourly_usage(&classified)?,
            by_day_type: StatsCalculator::usage_by_day_type(&classified),
        })
    }
}
