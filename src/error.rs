//! Error types and handling for the DocBase MCP server

use std::error::Error as StdError;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed tool arguments, caught before any request is sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network, DNS or TLS failure while talking to DocBase
    #[error("Request failed: {0}")]
    Transport(String),

    /// DocBase answered with a status outside the operation's success set
    #[error("Unexpected status code: {status}{}", format_body(.body))]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_body(body: &str) -> String {
    if body.trim().is_empty() {
        String::new()
    } else {
        format!(" ({})", body.trim())
    }
}

impl AppError {
    /// Get the error code for MCP responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Transport(_) => "transport_error",
            AppError::UnexpectedStatus { .. } => "unexpected_status",
            AppError::Decode(_) => "decode_error",
            AppError::Timeout(_) => "timeout",
            AppError::Cancelled(_) => "cancelled",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Process exit code used in CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 1,
            AppError::UnexpectedStatus { status: 404, .. } => 3,
            AppError::Transport(_) | AppError::UnexpectedStatus { .. } | AppError::Decode(_) => 2,
            AppError::Timeout(_) => 4,
            AppError::Cancelled(_) | AppError::Internal(_) => 5,
        }
    }

    pub fn missing(field: &str) -> Self {
        AppError::InvalidInput(format!("{} is required", field))
    }
}

/// Convert reqwest::Error to AppError
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if err.is_timeout() {
            AppError::Timeout(message)
        } else if err.is_decode() {
            AppError::Decode(message)
        } else if err.is_builder() {
            AppError::Internal(message)
        } else {
            AppError::Transport(message)
        }
    }
}

/// Render an error with every `source()` cause appended, so the DNS, TLS
/// or socket failure under a reqwest error stays visible
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

/// Reject empty values for required arguments
pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    if value.is_empty() {
        return Err(AppError::missing(field));
    }
    Ok(value)
}
