use crate::config::ConfigError;
use crate::fetch::error::FetchError;
use crate::geocode::error::GeocodeError;
use crate::render::RenderError;
use crate::series::error::SeriesError;
use crate::types::date_range::DateRangeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherTrendsError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of a [`WeatherTrendsError`], for deciding how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Geocoding or archive request failed, including exhausted retries.
    Network,
    /// A response did not have the expected shape.
    DataFormat,
    /// Too few observations for the requested plot.
    InsufficientData,
    InvalidDateRange,
    Configuration,
    Cache,
    Render,
}

fn fetch_kind(error: &FetchError) -> ErrorKind {
    match error {
        e if e.is_cache() => ErrorKind::Cache,
        FetchError::JsonParse { .. } => ErrorKind::DataFormat,
        FetchError::ClientBuild(_) | FetchError::InvalidUrl { .. } => ErrorKind::Configuration,
        _ => ErrorKind::Network,
    }
}

impl WeatherTrendsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherTrendsError::Fetch(e) => fetch_kind(e),
            WeatherTrendsError::Geocode(GeocodeError::Fetch(e)) => fetch_kind(e),
            WeatherTrendsError::Geocode(_) => ErrorKind::Network,
            WeatherTrendsError::Series(SeriesError::InsufficientData { .. }) => {
                ErrorKind::InsufficientData
            }
            WeatherTrendsError::Series(SeriesError::InvalidFilter { .. }) => {
                ErrorKind::Configuration
            }
            WeatherTrendsError::Series(_) => ErrorKind::DataFormat,
            WeatherTrendsError::DateRange(_) => ErrorKind::InvalidDateRange,
            WeatherTrendsError::Render(_) => ErrorKind::Render,
            WeatherTrendsError::Config(_) => ErrorKind::Configuration,
        }
    }
}
