//! Error types shared by the dashboard outside the poll path.
//!
//! Poll failures have their own `ApiError` in `api::signal::models`, since its
//! `Display` text is what ends up on screen.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Invalid or unparseable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart drawing failed
    #[error("Chart error: {0}")]
    Chart(String),
}
