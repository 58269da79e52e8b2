//! Error types for moorfeed-sofs.

/// Errors that can occur while scraping or decoding the SOFS feed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// HTTP transport failure (catalog fetch or NetCDF download).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog page did not have the expected shape.
    #[error("Catalog error: {message}")]
    Catalog {
        /// What was malformed
        message: String,
    },

    /// A downloaded NetCDF file could not be decoded.
    #[error("NetCDF error in {file}: {message}")]
    NetCdf {
        /// The file that failed to decode
        file: String,
        /// Decoder failure description
        message: String,
    },

    /// The last-upload-date state file is unreadable or malformed.
    #[error("State file error: {message}")]
    State {
        /// What went wrong
        message: String,
    },

    /// Error from the core types (frame assembly, validation).
    #[error(transparent)]
    Core(#[from] moorfeed_core::Error),

    /// I/O error (download staging, state file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type alias for SOFS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Transport failures are; malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Io(_) => true,
            Error::Catalog { .. } => false,
            Error::NetCdf { .. } => false,
            Error::State { .. } => false,
            Error::Core(e) => e.is_retryable(),
        }
    }

    /// Creates a new catalog error.
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Error::Catalog {
            message: message.into(),
        }
    }

    /// Creates a new NetCDF decode error for a named file.
    pub fn netcdf<F, M>(file: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::NetCdf {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Creates a new state-file error.
    pub fn state<S: Into<String>>(message: S) -> Self {
        Error::State {
            message: message.into(),
        }
    }
}
