//! Bike-Sharing Usage Dashboard
//!
//! Loads the combined daily/hourly usage dataset, filters it by date range and
//! draws four descriptive charts, either in a desktop window or as PNG files.

pub mod charts;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod gui;
pub mod stats;

pub use error::{DashboardError, Result};
