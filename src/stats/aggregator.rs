//! Usage Aggregator Module
//! Group-wise sums and means computed with Polars.

use crate::data::schema::*;
use crate::data::ProcessorError;
use polars::prelude::*;
use serde::Serialize;

/// Total daily count for one value of the working-day flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    pub is_working_day: u8,
    pub total: i64,
}

/// Mean hourly count for one `(hour, day_type)` group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyUsage {
    pub hour: u32,
    pub day_type: DayType,
    pub mean_count: f64,
}

/// Computes the aggregated tables behind the bar and line charts.
pub struct UsageAggregator;

impl UsageAggregator {
    /// Sum `daily_count` per working-day flag, ordered 0 then 1.
    pub fn daily_usage(records: &[UsageRecord]) -> Result<Vec<DailyUsage>, ProcessorError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let flags: Vec<i32> = records.iter().map(|r| i32::from(r.is_working_day)).collect();
        let counts: Vec<i64> = records.iter().map(|r| i64::from(r.daily_count)).collect();
        let df = DataFrame::new(vec![
            Column::new(WORKING_DAY_COL.into(), flags),
            Column::new(DAILY_COUNT_COL.into(), counts),
        ])?;

        let grouped = df
            .lazy()
            .group_by([col(WORKING_DAY_COL)])
            .agg([col(DAILY_COUNT_COL).sum()])
            .sort_by_exprs(vec![col(WORKING_DAY_COL)], SortMultipleOptions::default())
            .collect()?;

        let flag_col = grouped.column(WORKING_DAY_COL)?.cast(&DataType::Int32)?;
        let total_col = grouped.column(DAILY_COUNT_COL)?.cast(&DataType::Int64)?;
        let flags = flag_col.i32()?;
        let totals = total_col.i64()?;

        let rows = (0..grouped.height())
            .filter_map(|i| {
                Some(DailyUsage {
                    is_working_day: u8::try_from(flags.get(i)?).ok()?,
                    total: totals.get(i)?,
                })
            })
            .collect();
        Ok(rows)
    }

    /// Mean `hourly_count` per `(hour, day_type)`, ordered by hour then day type.
    pub fn hourly_usage(records: &[ClassifiedRecord]) -> Result<Vec<HourlyUsage>, ProcessorError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let hours: Vec<i64> = records.iter().map(|r| i64::from(r.record.hour)).collect();
        let day_types: Vec<&str> = records.iter().map(|r| r.day_type.label()).collect();
        let counts: Vec<f64> = records
            .iter()
            .map(|r| f64::from(r.record.hourly_count))
            .collect();
        let df = DataFrame::new(vec![
            Column::new(HOUR_COL.into(), hours),
            Column::new(DAY_TYPE_COL.into(), day_types),
            Column::new(HOURLY_COUNT_COL.into(), counts),
        ])?;

        let grouped = df
            .lazy()
            .group_by([col(HOUR_COL), col(DAY_TYPE_COL)])
            .agg([col(HOURLY_COUNT_COL).mean()])
            .sort_by_exprs(
                vec![col(HOUR_COL), col(DAY_TYPE_COL)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let hour_col = grouped.column(HOUR_COL)?.cast(&DataType::Int64)?;
        let mean_col = grouped.column(HOURLY_COUNT_COL)?.cast(&DataType::Float64)?;
        let hours = hour_col.i64()?;
        let labels = grouped.column(DAY_TYPE_COL)?.str()?;
        let means = mean_col.f64()?;

        let rows = (0..grouped.height())
            .filter_map(|i| {
                Some(HourlyUsage {
                    hour: u32::try_from(hours.get(i)?).ok()?,
                    day_type: DayType::from_label(labels.get(i)?)?,
                    mean_count: means.get(i)?,
                })
            })
            .collect();
        Ok(rows)
    }
}
