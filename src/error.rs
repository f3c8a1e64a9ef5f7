//! Error types for the todo client

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client-side rule violations, raised before any network call
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("No token available")]
    SessionAbsent,

    /// A response arrived after a newer login, refresh or logout
    #[error("Authentication response superseded by a newer session change")]
    Superseded,

    #[error("Request failed with status {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("No drawing surface attached")]
    SurfaceDetached,

    #[error("Image encoding error: {0}")]
    Encoding(String),

    #[error("Config file not found. Run 'todo-client init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// HTTP status carried by this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth(e) => Some(e.status),
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an authentication API call
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message} (status {status})")]
pub struct AuthError {
    pub message: String,
    /// 0 when no response was received
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

impl AuthError {
    pub const GENERIC_MESSAGE: &'static str = "An authentication error occurred";

    /// Build from a status and an optional server message, synthesizing one when absent
    pub fn from_status(status: u16, server_message: Option<String>, timestamp: DateTime<Utc>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| Self::message_for_status(status).to_string());
        Self {
            message,
            status,
            timestamp,
        }
    }

    pub fn message_for_status(status: u16) -> &'static str {
        match status {
            401 => "Invalid credentials",
            400 => "Invalid data",
            409 => "This user already exists",
            _ => Self::GENERIC_MESSAGE,
        }
    }
}
