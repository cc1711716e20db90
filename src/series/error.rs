use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("Archive payload is missing required field '{0}'")]
    MissingField(String),

    #[error("Archive payload has {found} values but its time range yields {expected} timestamps")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Sample interval must be positive, got {0} seconds")]
    InvalidInterval(i64),

    #[error("Archive payload is malformed: {0}")]
    Malformed(String),

    #[error("Smoothing needs at least {required} daily values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Smoothing window of {window} points cannot fit a polynomial of degree {order}")]
    InvalidFilter { window: usize, order: usize },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

impl SeriesError {
    /// `true` for errors caused by a malformed or inconsistent archive payload.
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            SeriesError::MissingField(_)
                | SeriesError::LengthMismatch { .. }
                | SeriesError::InvalidInterval(_)
                | SeriesError::Malformed(_)
        )
    }
}
