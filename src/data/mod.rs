//! Data module - CSV loading, filtering and classification

mod loader;
mod processor;
pub mod schema;

pub use loader::{DataLoader, Dataset, LoadReport, LoaderError};
pub use processor::{DataProcessor, DateRange, ProcessorError};
pub use schema::{ClassifiedRecord, DayType, UsageRecord, WeatherCategory};
