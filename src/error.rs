//! Application error types.
//!
//! These errors are serializable so a front end can render them as structured
//! objects, and every variant maps to one failure class of the portal client:
//! network, HTTP status, response shape, invalid input, configuration.

use serde::Serialize;
use thiserror::Error;

/// Application-level errors returned by the portal client.
///
/// All variants serialize to a structured JSON object for frontend consumption.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Platform API answered with a non-success status.
    #[error("API error: {message}")]
    Api {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Request never reached the server or timed out.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Session token expired or revoked - requires logging in again.
    #[error("Session expired: {message}")]
    AuthenticationExpired { message: String },

    /// Response JSON does not match any recognized shape.
    #[error("Unexpected response shape: {message}")]
    ShapeMismatch {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },

    /// Configuration file or environment is unusable.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create an API error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code: None,
            endpoint: None,
        }
    }

    /// Create an API error with status code and endpoint.
    pub fn api_full(message: impl Into<String>, status_code: u16, endpoint: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an authentication expired error.
    pub fn authentication_expired(message: impl Into<String>) -> Self {
        Self::AuthenticationExpired {
            message: message.into(),
        }
    }

    /// Create a shape mismatch error for a response from `endpoint`.
    pub fn shape_mismatch(message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field name.
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code, if this error came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            Self::AuthenticationExpired { .. } => Some(401),
            _ => None,
        }
    }

    /// Check if the backend reported a conflict (409).
    ///
    /// Status transitions answer 409 when the row is already in the target state.
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }

    /// Check if this is an authentication expired error.
    pub fn is_authentication_expired(&self) -> bool {
        matches!(self, Self::AuthenticationExpired { .. })
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_status() {
            Self::api(format!("HTTP error: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}
