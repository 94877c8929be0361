//! Charts module - chart definitions, interactive plotting and static rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::PngExporter;

use crate::data::{ClassifiedRecord, DayType};
use crate::error::Result;
use crate::stats::{DailyUsage, HourlyUsage};

/// RGB triple shared by the egui and plotters backends.
pub type Rgb = (u8, u8, u8);

/// Bar chart palette (pastel), indexed by working-day flag.
pub const BAR_PALETTE: [Rgb; 2] = [(161, 201, 244), (255, 180, 130)];
/// Line chart palette (Set1).
pub const LINE_PALETTE: [Rgb; 2] = [(228, 26, 28), (55, 126, 184)];
/// Scatter palette: weekend blue, working day orange.
pub const SCATTER_PALETTE: [Rgb; 2] = [(0, 0, 255), (255, 165, 0)];
/// Box chart palette (Set2).
pub const BOX_PALETTE: [Rgb; 2] = [(102, 194, 165), (252, 141, 98)];

pub const SCATTER_ALPHA: f32 = 0.6;

/// Horizontal offset of each day type's box around its weather category.
pub const BOX_OFFSET: f64 = 0.2;
pub const BOX_WIDTH: f64 = 0.35;

pub fn day_type_color(palette: &[Rgb; 2], day_type: DayType) -> Rgb {
    palette[usize::from(day_type.flag())]
}

pub fn box_position(weather_code: u8, day_type: DayType) -> f64 {
    let offset = match day_type {
        DayType::Weekend => -BOX_OFFSET,
        DayType::WorkingDay => BOX_OFFSET,
    };
    f64::from(weather_code) + offset
}

/// Tick label for an integer position, empty between integers.
pub(crate) fn integer_label(value: f64, label: impl Fn(i64) -> Option<String>) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 {
        return String::new();
    }
    label(rounded as i64).unwrap_or_default()
}

/// The four dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    DailyUsage,
    HourlyUsage,
    TemperatureScatter,
    WeatherDistribution,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::DailyUsage,
        ChartKind::HourlyUsage,
        ChartKind::TemperatureScatter,
        ChartKind::WeatherDistribution,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::DailyUsage => "Total Bike Usage: Working Day vs Weekend",
            ChartKind::HourlyUsage => "Hourly Bike Usage Pattern: Working Day vs Weekend",
            ChartKind::TemperatureScatter => "Effect of Temperature on Bike Usage",
            ChartKind::WeatherDistribution => "Bike Usage Distribution by Weather",
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            ChartKind::DailyUsage => "Working Day (1 = Yes, 0 = No)",
            ChartKind::HourlyUsage => "Hour",
            ChartKind::TemperatureScatter => "Temperature (temp_hour)",
            ChartKind::WeatherDistribution => {
                "Weather Category (1 = Clear, 2 = Misty, 3 = Light Rain, 4 = Heavy Rain)"
            }
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::DailyUsage => "Total Bike Usage",
            ChartKind::HourlyUsage => "Average Bike Usage",
            ChartKind::TemperatureScatter | ChartKind::WeatherDistribution => {
                "Bike Users (cnt_hour)"
            }
        }
    }

    /// Warning shown in place of the chart when its input is empty.
    pub fn empty_message(&self) -> &'static str {
        match self {
            ChartKind::DailyUsage => "No matching data to display in the daily usage chart.",
            ChartKind::HourlyUsage => "No matching data to display in the hourly usage chart.",
            ChartKind::TemperatureScatter => "No matching data for the scatter plot.",
            ChartKind::WeatherDistribution => "No matching data for the box plot.",
        }
    }

    /// File name stem used by the PNG export.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::DailyUsage => "daily_usage",
            ChartKind::HourlyUsage => "hourly_usage",
            ChartKind::TemperatureScatter => "temperature_scatter",
            ChartKind::WeatherDistribution => "weather_distribution",
        }
    }
}

/// A chart ready to be drawn, carrying its input table.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// Bar chart of total daily count by working-day flag.
    DailyUsage(Vec<DailyUsage>),
    /// Line chart of mean hourly count by hour and day type.
    HourlyUsage(Vec<HourlyUsage>),
    /// Temperature vs hourly count, colored by day type.
    TemperatureScatter(Vec<ClassifiedRecord>),
    /// Hourly count distribution by weather category and day type.
    WeatherDistribution(Vec<ClassifiedRecord>),
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::DailyUsage(_) => ChartKind::DailyUsage,
            Chart::HourlyUsage(_) => ChartKind::HourlyUsage,
            Chart::TemperatureScatter(_) => ChartKind::TemperatureScatter,
            Chart::WeatherDistribution(_) => ChartKind::WeatherDistribution,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Chart::DailyUsage(rows) => rows.is_empty(),
            Chart::HourlyUsage(rows) => rows.is_empty(),
            Chart::TemperatureScatter(rows) | Chart::WeatherDistribution(rows) => rows.is_empty(),
        }
    }
}

/// Presentation layer: receives either a chart or the warning that replaces it.
pub trait ChartSink {
    /// Called once before the charts of a refresh.
    fn begin(&mut self, _rows: usize) {}

    fn render(&mut self, chart: Chart) -> Result<()>;

    fn warn(&mut self, kind: ChartKind, message: &str);
}
