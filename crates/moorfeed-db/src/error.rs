//! Error types for moorfeed-db.

/// Errors that can occur while resolving tables or writing observations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Database error (connection, query, transaction).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A constructed table name failed validation before interpolation.
    #[error("Invalid table name '{name}': {message}")]
    InvalidTable {
        /// The offending name
        name: String,
        /// Why it was rejected
        message: String,
    },

    /// The frame to upload holds no observations.
    #[error("Nothing to upload for station {station}")]
    EmptyFrame {
        /// Station the upload was meant for
        station: String,
    },

    /// Error from the core types.
    #[error(transparent)]
    Core(#[from] moorfeed_core::Error),
}

/// Convenience `Result` type alias for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Database errors may be transient; everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Database(_) => true,
            Error::InvalidTable { .. } => false,
            Error::EmptyFrame { .. } => false,
            Error::Core(e) => e.is_retryable(),
        }
    }

    /// Creates a new invalid-table error.
    pub fn invalid_table<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Error::InvalidTable {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_table_display() {
        let err = Error::invalid_table("eng_x;drop", "illegal character");
        assert!(err.to_string().contains("eng_x;drop"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_frame_display() {
        let err = Error::EmptyFrame {
            station: "SOFS".to_string(),
        };
        assert_eq!(err.to_string(), "Nothing to upload for station SOFS");
    }
}
