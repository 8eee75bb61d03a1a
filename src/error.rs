//! Huginn error types

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Request validation errors
    /// A parameter held a value outside its closed vocabulary.
    #[error("{value} is not a valid {kind}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("malformed {param}: {reason}")]
    MalformedParameter { param: &'static str, reason: String },

    #[error("{0} is not a valid provider")]
    UnknownProvider(String),

    #[error("provider {provider} does not support {operation}")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },

    // Upstream errors
    #[error("not found: {0}")]
    NotFound(String),

    #[error("session acquisition failed: {0}")]
    Session(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache error: {0}")]
    Cache(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// Whether this error was caused by the request itself rather than by
    /// an upstream failure.
    ///
    /// Client errors are raised before any provider or cache work happens.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HuginnError::InvalidValue { .. }
                | HuginnError::MissingParameter(_)
                | HuginnError::MalformedParameter { .. }
                | HuginnError::UnknownProvider(_)
                | HuginnError::Unsupported { .. }
        )
    }

    /// Whether the upstream reported that the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HuginnError::NotFound(_))
    }
}

impl From<reqwest::Error> for HuginnError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            HuginnError::NotFound(err.to_string())
        } else {
            HuginnError::Http(err.to_string())
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
