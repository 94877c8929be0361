//! Usage Record Schema
//! Source column names and the typed row model.

use crate::data::ProcessorError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const DATE_COL: &str = "dteday";
pub const WORKING_DAY_COL: &str = "workingday_day";
pub const HOUR_COL: &str = "weekday_hour";
pub const DAILY_COUNT_COL: &str = "cnt_day";
pub const HOURLY_COUNT_COL: &str = "cnt_hour";
pub const TEMPERATURE_COL: &str = "temp_hour";
pub const WEATHER_COL: &str = "weathersit_day";

/// Derived column, never read from the file.
pub const DAY_TYPE_COL: &str = "day_type";

/// Columns the loader requires, in load order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    DATE_COL,
    WORKING_DAY_COL,
    HOUR_COL,
    DAILY_COUNT_COL,
    HOURLY_COUNT_COL,
    TEMPERATURE_COL,
    WEATHER_COL,
];

/// Derived label for the working-day flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    #[serde(rename = "Weekend")]
    Weekend,
    #[serde(rename = "Working Day")]
    WorkingDay,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekend, DayType::WorkingDay];

    /// Map the working-day flag: 0 is a weekend or holiday, 1 a working day.
    pub fn from_flag(flag: u8) -> Result<Self, ProcessorError> {
        match flag {
            0 => Ok(DayType::Weekend),
            1 => Ok(DayType::WorkingDay),
            other => Err(ProcessorError::InvalidWorkingDayFlag(other)),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.label() == label)
    }

    pub fn flag(&self) -> u8 {
        match self {
            DayType::Weekend => 0,
            DayType::WorkingDay => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayType::Weekend => "Weekend",
            DayType::WorkingDay => "Working Day",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordinal weather severity code (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum WeatherCategory {
    Clear = 1,
    Misty = 2,
    LightRain = 3,
    HeavyRain = 4,
}

impl WeatherCategory {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(WeatherCategory::Clear),
            2 => Some(WeatherCategory::Misty),
            3 => Some(WeatherCategory::LightRain),
            4 => Some(WeatherCategory::HeavyRain),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCategory::Clear => "Clear",
            WeatherCategory::Misty => "Misty",
            WeatherCategory::LightRain => "Light Rain",
            WeatherCategory::HeavyRain => "Heavy Rain",
        }
    }
}

impl From<WeatherCategory> for u8 {
    fn from(value: WeatherCategory) -> Self {
        value.code()
    }
}

/// One observation of the combined daily/hourly dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub date: NaiveDate,
    /// 1 = working day, 0 = weekend or holiday.
    pub is_working_day: u8,
    pub hour: u32,
    pub daily_count: u32,
    pub hourly_count: u32,
    /// Normalized temperature for the hour.
    pub temperature: f64,
    pub weather: WeatherCategory,
}

/// A usage record with its derived day type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: UsageRecord,
    pub day_type: DayType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_type_from_flag() {
        assert_eq!(DayType::from_flag(0).unwrap(), DayType::Weekend);
        assert_eq!(DayType::from_flag(1).unwrap(), DayType::WorkingDay);
        assert!(matches!(
            DayType::from_flag(2),
            Err(ProcessorError::InvalidWorkingDayFlag(2))
        ));
    }

    #[test]
    fn test_day_type_label_roundtrip() {
        for dt in DayType::ALL {
            assert_eq!(DayType::from_label(dt.label()), Some(dt));
            assert_eq!(DayType::from_flag(dt.flag()).unwrap(), dt);
        }
        assert_eq!(DayType::from_label("Holiday"), None);
    }

    #[test]
    fn test_day_type_order_matches_flag() {
        assert!(DayType::Weekend < DayType::WorkingDay);
        assert!(DayType::Weekend.label() < DayType::WorkingDay.label());
    }

    #[test]
    fn test_weather_codes() {
        for code in 1..=4u8 {
            assert_eq!(WeatherCategory::from_code(code).unwrap().code(), code);
        }
        assert_eq!(WeatherCategory::from_code(0), None);
        assert_eq!(WeatherCategory::from_code(5), None);
        assert_eq!(WeatherCategory::LightRain.label(), "Light Rain");
    }

    #[test]
    fn test_day_type_serializes_as_label() {
        let json = serde_json::to_string(&DayType::WorkingDay).unwrap();
        assert_eq!(json, "\"Working Day\"");
    }

    #[test]
    fn test_weather_serializes_as_code() {
        let json = serde_json::to_string(&WeatherCategory::HeavyRain).unwrap();
        assert_eq!(json, "4");
    }
}
