//! Error types for the API client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Fallback shown when the backend gives no usable message
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Backend rejected the credentials, after any refresh attempt
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Non-success response other than 401
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Refresh endpoint failed
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// File upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain validation failed before sending
    #[error(transparent)]
    Core(#[from] rental_core::Error),
}

impl ClientError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Text suitable for a toast notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message } | Self::Http { message, .. } => message.clone(),
            Self::Upload(message) => message.clone(),
            Self::Core(err) => err.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
