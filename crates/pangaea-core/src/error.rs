use thiserror::Error;

/// Canonical error type for dataset handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Dataset descriptor is missing a required attribute.
    #[error("dataset `{id}` has no {attribute}")]
    MissingAttribute {
        /// Dataset identifier.
        id: String,
        /// Name of the absent attribute (e.g. `"licence"`).
        attribute: &'static str,
    },

    /// I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error occurred.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error occurred.
    #[error("deserialization error: {0}")]
    DeserializationError(String),
}

impl CoreError {
    /// Creates a `MissingAttribute` variant.
    #[must_use]
    pub fn missing(id: impl Into<String>, attribute: &'static str) -> Self {
        Self::MissingAttribute {
            id: id.into(),
            attribute,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_eof() || err.is_syntax() || err.is_data() {
            Self::DeserializationError(err.to_string())
        } else {
            Self::SerializationError(err.to_string())
        }
    }
}

/// Convenient result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
