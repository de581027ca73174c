//! Error types for the capsolver-rs library.

use thiserror::Error;

/// Main error type for capsolver-rs operations.
///
/// Only local validation problems and transport-level failures surface as
/// errors. Application-level failures reported by the solving service
/// (`errorId != 0`, exhausted poll budget) come back as a normally-returned
/// [`CaptchaResponse`](crate::CaptchaResponse) with `status = failed`.
#[derive(Error, Debug)]
pub enum SolverError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] rquest::Error),

    /// Server answered with a status code outside the accepted set
    #[error("unexpected HTTP status code: {0}")]
    UnexpectedStatus(u16),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base URL or endpoint path
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Captcha type name is not among the supported set
    #[error("unsupported captcha type: {0}")]
    UnsupportedType(String),

    /// A required task field is missing or empty
    #[error("missing required field `{field}` for {captcha_type}")]
    MissingField {
        captcha_type: &'static str,
        field: &'static str,
    },

    /// Server reply was parseable but structurally unusable
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    /// IO error (blocking runtime construction)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for capsolver-rs operations.
pub type Result<T> = std::result::Result<T, SolverError>;
