//! Error types for the places crate.

use thiserror::Error;

/// Result type alias for places operations.
pub type Result<T> = std::result::Result<T, PlacesError>;

/// Reasons a record is rejected at the normalization boundary.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Record is not a JSON object
    #[error("Record is not an object")]
    NotAnObject,

    /// No usable identifier
    #[error("Record has no id")]
    MissingId,

    /// Location missing, non-numeric, non-finite or out of range
    #[error("Record {0} has no valid location")]
    InvalidLocation(String),

    /// Id already seen earlier in the batch
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Batch input holds no record array
    #[error("Input is not an array of records")]
    NotAnArray,

    /// Input is not valid JSON
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with the CLI's error reporting.
/// Range: 11xxx for places errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesErrorCode {
    /// Record is not an object
    NotAnObject = 11001,
    /// No usable identifier
    MissingId = 11002,
    /// Location missing or malformed
    InvalidLocation = 11003,
    /// Duplicate id
    DuplicateId = 11004,
    /// JSON parsing error
    JsonParsing = 11005,
    /// Batch input holds no record array
    NotAnArray = 11006,
}

impl PlacesError {
    /// Returns the error code for this error.
    pub fn code(&self) -> PlacesErrorCode {
        match self {
            PlacesError::NotAnObject => PlacesErrorCode::NotAnObject,
            PlacesError::MissingId => PlacesErrorCode::MissingId,
            PlacesError::InvalidLocation(_) => PlacesErrorCode::InvalidLocation,
            PlacesError::DuplicateId(_) => PlacesErrorCode::DuplicateId,
            PlacesError::JsonError(_) => PlacesErrorCode::JsonParsing,
            PlacesError::NotAnArray => PlacesErrorCode::NotAnArray,
        }
    }
}
