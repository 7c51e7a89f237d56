use crate::ephemeris::EphemerisError;
use thiserror::Error;

/// Errors that abort a chart computation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("Chart computation failed: {0}")]
    Internal(String),
}

impl ChartError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ChartError::InvalidInput {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
