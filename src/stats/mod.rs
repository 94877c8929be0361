//! Stats module - aggregation and descriptive statistics

mod aggregator;
mod summary;

pub use aggregator::{DailyUsage, HourlyUsage, UsageAggregator};
pub use summary::{BoxSummary, StatsCalculator, UsageStats, WeatherBox};
