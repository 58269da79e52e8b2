//! Error types for moorfeed-core.

/// Errors that can occur while parsing or assembling observation data.
///
/// All error variants are marked `#[non_exhaustive]` to allow adding new
/// error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A source file or payload could not be parsed.
    #[error("Parse error{}: {message}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse {
        /// What failed to parse
        message: String,
        /// One-based line number where the failure occurred, if known
        line: Option<usize>,
    },

    /// Input data failed a structural or semantic check.
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type alias for moorfeed operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error is retryable.
    ///
    /// Parse and validation failures are permanent: retrying the same input
    /// cannot succeed. I/O failures may be transient (file share hiccups).
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Parse { .. } => false,
            Error::Validation { .. } => false,
        }
    }

    /// Creates a new parse error with a message.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
            line: None,
        }
    }

    /// Creates a new parse error with a message and line number.
    pub fn parse_at<S: Into<String>>(message: S, line: usize) -> Self {
        Error::Parse {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}
