//! Statistics Summary Module
//! Descriptive statistics and box-plot summaries over hourly counts.

use crate::data::schema::{ClassifiedRecord, DayType, WeatherCategory};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Descriptive statistics of hourly counts for one day type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageStats {
    pub day_type: DayType,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Five-number box summary plus the points beyond the whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Hourly count distribution for one `(weather, day_type)` group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherBox {
    pub weather: WeatherCategory,
    pub day_type: DayType,
    pub summary: BoxSummary,
}

/// Handles descriptive statistics for the selected records.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(day_type: DayType, values: &[f64]) -> Option<UsageStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Sample standard deviation is undefined for a single value
        let std = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        Some(UsageStats {
            day_type,
            count: values.len(),
            mean: values.iter().mean(),
            median: Self::percentile(&sorted, 50.0),
            std,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        })
    }

    /// Statistics of hourly counts per day type, weekend first.
    pub fn usage_by_day_type(records: &[ClassifiedRecord]) -> Vec<UsageStats> {
        DayType::ALL
            .into_iter()
            .filter_map(|day_type| {
                let values: Vec<f64> = records
                    .iter()
                    .filter(|r| r.day_type == day_type)
                    .map(|r| f64::from(r.record.hourly_count))
                    .collect();
                Self::compute_descriptive_stats(day_type, &values)
            })
            .collect()
    }

    /// Box summary with whiskers at the furthest values inside 1.5 IQR.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(BoxSummary {
            count: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Box summaries grouped by weather category, then day type.
    pub fn weather_distribution(records: &[ClassifiedRecord]) -> Vec<WeatherBox> {
        let mut groups: BTreeMap<(WeatherCategory, DayType), Vec<f64>> = BTreeMap::new();
        for r in records {
            groups
                .entry((r.record.weather, r.day_type))
                .or_default()
                .push(f64::from(r.record.hourly_count));
        }

        groups
            .into_iter()
            .filter_map(|((weather, day_type), values)| {
                Some(WeatherBox {
                    weather,
                    day_type,
                    summary: Self::box_summary(&values)?,
                })
            })
            .collect()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
