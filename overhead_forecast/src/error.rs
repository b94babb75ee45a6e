use std::io;

use config::ConfigError;
use jiff::civil::{Date, DateTime};
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Error regarding config: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("System input/output error: {0}")]
    IoError(#[from] io::Error),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Malformed forecast data: {0}")]
    DataError(String),
    #[error("Time error: {0}")]
    TimeError(#[from] jiff::Error),
    #[error("No forecast entry for {0}")]
    ForecastMissing(DateTime),
    #[error("Unknown runway designator: {0:?}")]
    InvalidRunway(String),
    #[error("Schedule week {0} does not start on a Monday")]
    ScheduleWeekNotMonday(Date),
}
