//! Data Processor Module
//! Date range filtering and day-type classification.

use crate::data::schema::{ClassifiedRecord, DayType, UsageRecord};
use chrono::NaiveDate;
use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Invalid working-day flag {0}, expected 0 or 1")]
    InvalidWorkingDayFlag(u8),
}

/// Inclusive `[start, end]` date range, ordered on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ProcessorError> {
        if start > end {
            return Err(ProcessorError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Handles filtering and classification of usage records.
pub struct DataProcessor;

impl DataProcessor {
    /// Records whose date lies within `range`, both ends inclusive.
    pub fn filter_by_date(records: &[UsageRecord], range: &DateRange) -> Vec<UsageRecord> {
        records
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect()
    }

    /// Attach the derived day type to every record.
    ///
    /// Fails on the first record whose working-day flag is not 0 or 1.
    pub fn classify(records: &[UsageRecord]) -> Result<Vec<ClassifiedRecord>, ProcessorError> {
        records
            .iter()
            .map(|record| {
                Ok(ClassifiedRecord {
                    day_type: DayType::from_flag(record.is_working_day)?,
                    record: record.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::WeatherCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: u32, is_working_day: u8) -> UsageRecord {
        UsageRecord {
            date: date(2011, 1, day),
            is_working_day,
            hour: day,
            daily_count: 100 + day,
            hourly_count: day * 3,
            temperature: 0.2,
            weather: WeatherCategory::Clear,
        }
    }

    fn month() -> Vec<UsageRecord> {
        (1..=31).map(|d| record(d, u8::from(d % 7 > 1))).collect()
    }

    #[test]
    fn test_date_range_rejects_reversed_bounds() {
        let err = DateRange::new(date(2011, 2, 1), date(2011, 1, 1)).unwrap_err();
        assert!(matches!(err, ProcessorError::InvalidDateRange { .. }));
        assert!(DateRange::new(date(2011, 1, 1), date(2011, 1, 1)).is_ok());
    }

    #[test]
    fn test_filter_is_inclusive() {
        let range = DateRange::new(date(2011, 1, 5), date(2011, 1, 10)).unwrap();
        let filtered = DataProcessor::filter_by_date(&month(), &range);
        assert_eq!(filtered.len(), 6);
        assert_eq!(filtered.first().unwrap().date, date(2011, 1, 5));
        assert_eq!(filtered.last().unwrap().date, date(2011, 1, 10));
    }

    #[test]
    fn test_filter_empty_source() {
        let range = DateRange::new(date(2011, 1, 1), date(2011, 12, 31)).unwrap();
        assert!(DataProcessor::filter_by_date(&[], &range).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let range = DateRange::new(date(2011, 1, 3), date(2011, 1, 17)).unwrap();
        let once = DataProcessor::filter_by_date(&month(), &range);
        let twice = DataProcessor::filter_by_date(&once, &range);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_wider_range_is_superset() {
        let source = month();
        let narrow = DateRange::new(date(2011, 1, 10), date(2011, 1, 12)).unwrap();
        let wide = DateRange::new(date(2011, 1, 8), date(2011, 1, 20)).unwrap();
        let narrow_rows = DataProcessor::filter_by_date(&source, &narrow);
        let wide_rows = DataProcessor::filter_by_date(&source, &wide);
        assert!(narrow_rows.iter().all(|r| wide_rows.contains(r)));
        assert!(wide_rows.len() > narrow_rows.len());
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let source = month();
        let snapshot = source.clone();
        let range = DateRange::new(date(2011, 1, 1), date(2011, 1, 2)).unwrap();
        let _ = DataProcessor::filter_by_date(&source, &range);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_classify_maps_flags() {
        let classified = DataProcessor::classify(&[record(1, 0), record(2, 1)]).unwrap();
        assert_eq!(classified[0].day_type, DayType::Weekend);
        assert_eq!(classified[1].day_type, DayType::WorkingDay);
        assert_eq!(classified[1].record, record(2, 1));
    }

    #[test]
    fn test_classify_is_stable_under_reapplication() {
        let first = DataProcessor::classify(&month()).unwrap();
        let records: Vec<UsageRecord> = first.iter().map(|c| c.record.clone()).collect();
        let second = DataProcessor::classify(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_rejects_unknown_flag() {
        let err = DataProcessor::classify(&[record(1, 1), record(2, 7)]).unwrap_err();
        assert!(matches!(err, ProcessorError::InvalidWorkingDayFlag(7)));
    }
}
