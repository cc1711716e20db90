use crate::fetch::error::FetchError;
use crate::types::lat_lon::LatLon;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("City must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Geocoding service rejected '{query}' (code {code}): {description}")]
    Service {
        query: String,
        code: String,
        description: String,
    },

    #[error("Geocoding service is throttling requests: {0}")]
    Throttled(String),

    #[error("Geocoding response for '{0}' has no coordinates")]
    MissingCoordinates(String),

    #[error("Geocoding response field '{field}' is not a number: '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("Geocoding returned coordinates outside the valid range: {0}")]
    OutOfRange(LatLon),
}
