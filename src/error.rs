//! Crate-level error type.

use crate::data::{LoaderError, ProcessorError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
