//! Error types for mealsync operations.
//!
//! This module defines the main error type [`MealsyncError`] which covers
//! configuration, input loading, and every request made against the Mealie API.
//!
//! Only configuration and input errors are meant to stop a run. Remote failures
//! are returned to the caller, which decides whether to skip the affected item.
//!
//! # Example
//!
//! ```rust
//! use mealsync_core::{MealsyncError, Result};
//!
//! fn require_token(token: &str) -> Result<&str> {
//!     if token.is_empty() {
//!         return Err(MealsyncError::MissingToken { var: "MEALIE_API_TOKEN" });
//!     }
//!     Ok(token)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for menu syncing.
#[derive(Error, Debug)]
pub enum MealsyncError {
    /// Transport-level failures from reqwest.
    ///
    /// Connection refused, DNS failures, TLS problems and the like.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The Mealie API answered with a non-2xx status.
    ///
    /// Carries the status code and the raw response text so callers can log
    /// what the server actually said.
    #[error("Mealie API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The base URL is not a valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The API token variable is unset or empty.
    #[error("{var} environment variable is required")]
    MissingToken { var: &'static str },

    /// Menu file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Reading the menu file or stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The menu source contained nothing but whitespace.
    #[error("No menu data received from {source_name}")]
    EmptyInput { source_name: String },

    /// The menu source is not valid menu JSON.
    #[error("Error parsing JSON from {source_name}: {message}")]
    MalformedInput { source_name: String, message: String },

    /// A 2xx response body that does not have the expected shape.
    #[error("Unexpected response from {context}: {message}")]
    Decode { context: String, message: String },

    /// Year outside the supported calendar range.
    #[error("Year {0} is outside the supported calendar range")]
    InvalidYear(i32),
}

impl MealsyncError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            MealsyncError::Api { status, .. } => Some(*status),
            MealsyncError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the ingredient parser should be retried with the next payload shape.
    ///
    /// Only client errors other than 401/403 qualify: a rejected payload shape
    /// shows up as 400/404/422, while auth failures will not improve on retry.
    pub fn is_retryable_parser_status(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status) && status != 401 && status != 403)
    }
}

/// Result type alias for MealsyncError.
pub type Result<T> = std::result::Result<T, MealsyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = MealsyncError::Api { status: 422, body: "{\"detail\":\"bad\"}".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("bad"));
    }

    #[test]
    fn test_missing_token_names_variable() {
        let err = MealsyncError::MissingToken { var: "MEALIE_API_TOKEN" };
        assert!(err.to_string().contains("MEALIE_API_TOKEN"));
    }

    #[test]
    fn test_parser_retry_statuses() {
        let api = |status| MealsyncError::Api { status, body: String::new() };
        assert!(api(400).is_retryable_parser_status());
        assert!(api(422).is_retryable_parser_status());
        assert!(api(404).is_retryable_parser_status());
        assert!(!api(401).is_retryable_parser_status());
        assert!(!api(403).is_retryable_parser_status());
        assert!(!api(500).is_retryable_parser_status());
        assert!(!MealsyncError::Timeout { timeout: 5 }.is_retryable_parser_status());
    }

    #[test]
    fn test_malformed_input_names_source() {
        let err = MealsyncError::MalformedInput { source_name: "stdin".to_string(), message: "EOF".to_string() };
        assert!(err.to_string().contains("stdin"));
    }
}
