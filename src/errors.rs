/// Error types for the application
///
/// `ApiError` travels inside iced messages, so it is `Clone` and carries
/// only owned strings. `Error` covers everything that happens locally
/// (storage, configuration, validation).

/// Shown when the movie database answers without any match
pub const NOT_FOUND_MESSAGE: &str = "Movie Not Found";

/// Shown for every other failure of a request
pub const GENERIC_MESSAGE: &str = "Something Went Wrong !!";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("user rating must be between 1 and {max}, got {rating}")]
    InvalidRating { rating: u8, max: u8 },

    #[error("could not determine a data directory")]
    NoDataDir,
}

/// Failures of a request against the movie database
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS or body read failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("server responded with status {0}")]
    Status(u16),

    /// Well-formed response that reports no match
    #[error("movie not found")]
    NotFound,

    #[error("malformed response: {0}")]
    Decode(String),

    /// Superseded by a newer request
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Text shown to the user in place of the results, if any.
    /// Cancellation is never surfaced.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ApiError::NotFound => Some(NOT_FOUND_MESSAGE),
            ApiError::Cancelled => None,
            ApiError::Transport(_) | ApiError::Status(_) | ApiError::Decode(_) => {
                Some(GENERIC_MESSAGE)
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
