//! CSV Data Loader Module
//! Reads the combined daily/hourly dataset with Polars and converts it into typed records.

use crate::data::schema::*;
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Days from 0001-01-01 (day 1) to the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data 'dteday' not found: the date column has no values")]
    NoData,
}

/// Row accounting for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

/// The immutable record collection loaded at process start.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<UsageRecord>,
    source: Option<PathBuf>,
}

impl Dataset {
    pub fn from_records(records: Vec<UsageRecord>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    /// Stand-in dataset used when loading failed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Earliest and latest date, bounds of the date selector.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    file_path: PathBuf,
}

impl DataLoader {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the CSV file and convert it into a [`Dataset`].
    pub fn load(&self) -> Result<(Dataset, LoadReport), LoaderError> {
        let df = self.read_frame()?;
        let (records, report) = Self::records_from_frame(&df)?;

        if records.is_empty() {
            return Err(LoaderError::NoData);
        }
        if report.skipped_rows > 0 {
            warn!(
                skipped = report.skipped_rows,
                total = report.total_rows,
                "Skipped rows with missing or out-of-range values"
            );
        }
        info!(
            path = %self.file_path.display(),
            rows = report.loaded_rows,
            "Loaded usage dataset"
        );

        let dataset = Dataset {
            records,
            source: Some(self.file_path.clone()),
        };
        Ok((dataset, report))
    }

    /// Read the required columns with their target dtypes.
    fn read_frame(&self) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(&self.file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_try_parse_dates(true)
            .with_ignore_errors(true)
            .finish()?
            .select(
                REQUIRED_COLUMNS
                    .iter()
                    .map(|&name| col(name).cast(column_dtype(name)))
                    .collect::<Vec<_>>(),
            )
            .collect()?;

        Ok(df)
    }

    /// Convert a frame holding [`REQUIRED_COLUMNS`] into typed records.
    ///
    /// Rows with a null, a working-day flag outside {0,1} or a weather code
    /// outside 1..=4 are skipped and counted.
    pub fn records_from_frame(
        df: &DataFrame,
    ) -> Result<(Vec<UsageRecord>, LoadReport), LoaderError> {
        let dates = df.column(DATE_COL)?.cast(&DataType::Int32)?;
        let flags = df.column(WORKING_DAY_COL)?.cast(&DataType::Int32)?;
        let hours = df.column(HOUR_COL)?.cast(&DataType::Int64)?;
        let daily = df.column(DAILY_COUNT_COL)?.cast(&DataType::Int64)?;
        let hourly = df.column(HOURLY_COUNT_COL)?.cast(&DataType::Int64)?;
        let temps = df.column(TEMPERATURE_COL)?.cast(&DataType::Float64)?;
        let weather = df.column(WEATHER_COL)?.cast(&DataType::Int32)?;

        let columns = FrameColumns {
            dates: dates.i32()?,
            flags: flags.i32()?,
            hours: hours.i64()?,
            daily: daily.i64()?,
            hourly: hourly.i64()?,
            temps: temps.f64()?,
            weather: weather.i32()?,
        };

        let records: Vec<UsageRecord> = (0..df.height()).filter_map(|i| columns.row(i)).collect();

        let report = LoadReport {
            total_rows: df.height(),
            loaded_rows: records.len(),
            skipped_rows: df.height() - records.len(),
        };
        Ok((records, report))
    }
}

/// Target dtype of a required column.
fn column_dtype(name: &str) -> DataType {
    match name {
        DATE_COL => DataType::Date,
        WORKING_DAY_COL | WEATHER_COL => DataType::Int32,
        TEMPERATURE_COL => DataType::Float64,
        _ => DataType::Int64,
    }
}

/// Typed views over the required columns.
struct FrameColumns<'a> {
    dates: &'a Int32Chunked,
    flags: &'a Int32Chunked,
    hours: &'a Int64Chunked,
    daily: &'a Int64Chunked,
    hourly: &'a Int64Chunked,
    temps: &'a Float64Chunked,
    weather: &'a Int32Chunked,
}

impl FrameColumns<'_> {
    fn row(&self, i: usize) -> Option<UsageRecord> {
        let date = NaiveDate::from_num_days_from_ce_opt(
            self.dates.get(i)?.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?,
        )?;
        let is_working_day = u8::try_from(self.flags.get(i)?)
            .ok()
            .filter(|flag| *flag <= 1)?;
        let weather = WeatherCategory::from_code(u8::try_from(self.weather.get(i)?).ok()?)?;

        Some(UsageRecord {
            date,
            is_working_day,
            hour: u32::try_from(self.hours.get(i)?).ok()?,
            daily_count: u32::try_from(self.daily.get(i)?).ok()?,
            hourly_count: u32::try_from(self.hourly.get(i)?).ok()?,
            temperature: self.temps.get(i).filter(|t| t.is_finite())?,
            weather,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: (i32, u32, u32)) -> UsageRecord {
        UsageRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            is_working_day: 1,
            hour: 0,
            daily_count: 1,
            hourly_count: 1,
            temperature: 0.3,
            weather: WeatherCategory::Clear,
        }
    }

    #[test]
    fn test_date_bounds() {
        let dataset = Dataset::from_records(vec![
            record((2011, 3, 5)),
            record((2011, 1, 1)),
            record((2012, 12, 31)),
        ]);
        let (min, max) = dataset.date_bounds().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2012, 12, 31).unwrap());
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let dataset = Dataset::empty();
        assert!(dataset.is_empty());
        assert_eq!(dataset.date_bounds(), None);
        assert_eq!(dataset.source(), None);
    }

    #[test]
    fn test_epoch_offset() {
        assert_eq!(
            NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAYS_FROM_CE),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
    }

    #[test]
    fn test_records_from_frame_skips_invalid_rows() {
        let epoch_days = |y, m, d| {
            (NaiveDate::from_ymd_opt(y, m, d).unwrap()
                - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
            .num_days() as i32
        };
        let df = DataFrame::new(vec![
            Column::new(
                DATE_COL.into(),
                vec![epoch_days(2011, 1, 1), epoch_days(2011, 1, 2), epoch_days(2011, 1, 3)],
            ),
            Column::new(WORKING_DAY_COL.into(), vec![0i32, 2, 1]),
            Column::new(HOUR_COL.into(), vec![0i64, 1, 2]),
            Column::new(DAILY_COUNT_COL.into(), vec![985i64, 801, 1349]),
            Column::new(HOURLY_COUNT_COL.into(), vec![16i64, 40, 32]),
            Column::new(TEMPERATURE_COL.into(), vec![0.24f64, 0.22, 0.22]),
            Column::new(WEATHER_COL.into(), vec![2i32, 1, 5]),
        ])
        .unwrap();

        let (records, report) = DataLoader::records_from_frame(&df).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            report,
            LoadReport {
                total_rows: 3,
                loaded_rows: 1,
                skipped_rows: 2,
            }
        );
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(records[0].weather, WeatherCategory::Misty);
        assert_eq!(records[0].daily_count, 985);
    }

    #[test]
    fn test_missing_file_is_error() {
        let loader = DataLoader::new("definitely/not/here/combined_data.csv");
        assert_eq!(
            loader.file_path(),
            Path::new("definitely/not/here/combined_data.csv")
        );
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_column_dtypes() {
        assert_eq!(column_dtype(DATE_COL), DataType::Date);
        assert_eq!(column_dtype(WORKING_DAY_COL), DataType::Int32);
        assert_eq!(column_dtype(WEATHER_COL), DataType::Int32);
        assert_eq!(column_dtype(TEMPERATURE_COL), DataType::Float64);
        assert_eq!(column_dtype(HOURLY_COUNT_COL), DataType::Int64);
    }

    #[test]
    fn test_missing_required_column_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.csv");
        std::fs::write(
            &path,
            "dteday,workingday_day,weekday_hour,cnt_day,temp_hour,weathersit_day\n\
             2011-01-01,0,0,985,0.24,2\n",
        )
        .unwrap();

        assert!(matches!(
            DataLoader::new(&path).load(),
            Err(LoaderError::CsvError(_))
        ));
    }
}
