//! Error types and handling for the FireFight application

use thiserror::Error;

/// Main error type for the FireFight application
#[derive(Error, Debug)]
pub enum FireFightError {
    /// Input rejected before any network call was made
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoder returned no candidate for the query
    #[error("Location not found: {query}")]
    NotFound { query: String },

    /// No device position capability is available
    #[error("Geolocation is not supported")]
    Unsupported,

    /// The device declined to share its position
    #[error("Geolocation permission denied: {message}")]
    PermissionDenied { message: String },

    /// The device did not report a position in time
    #[error("Geolocation request timed out")]
    Timeout,

    /// A network call could not complete
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A remote service answered with a failure status or an unreadable body
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FireFightError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new backend error from an HTTP status and message
    pub fn backend<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FireFightError::Validation { message } => message.clone(),
            FireFightError::NotFound { .. } => "Location not found.".to_string(),
            FireFightError::Unsupported => {
                "Geolocation is not supported by your browser.".to_string()
            }
            FireFightError::PermissionDenied { .. } | FireFightError::Timeout => {
                "Unable to retrieve your location.".to_string()
            }
            FireFightError::Transport { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            FireFightError::Backend { message, .. } => format!("Backend error: {message}"),
            FireFightError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            FireFightError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FireFightError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FireFightError::backend(status.as_u16(), err.to_string()),
            None => FireFightError::transport(err.to_string()),
        }
    }
}
