//! Error types for the site comparison engine.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors for request-level failures
//! - `ErrorResponse`: Serializable failure body handed to the outer boundary
//! - `Result<T>`: Type alias for Results using AppError

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for analysis requests.
///
/// Only acquisition failures and precondition violations are meant to reach
/// the caller. Narrative and presentation failures degrade locally.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Failed to parse a document or payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// One or both pages could not be acquired
    #[error("One or both websites failed to crawl.")]
    AcquisitionFailed {
        client: Option<String>,
        competitor: Option<String>,
    },

    /// An engine entry point was handed data it must never see
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// External service error (page extraction, text generation)
    #[error("Service error ({service}): {message}")]
    ServiceError { service: &'static str, message: String },

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a service error
    pub fn service(service: &'static str, msg: impl Into<String>) -> Self {
        Self::ServiceError { service, message: msg.into() }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionViolation(msg.into())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// ERROR RESPONSE (FOR THE OUTER BOUNDARY)
// ============================================================================

/// Serializable failure body.
///
/// Acquisition failures carry the per-side messages so the caller can tell
/// which site failed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitor_error: Option<String>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::AcquisitionFailed { client, competitor } => Self {
                success: false,
                error: error.to_string(),
                client_error: client.clone(),
                competitor_error: competitor.clone(),
            },
            other => Self {
                success: false,
                error: format!("{:#}", other),
                client_error: None,
                competitor_error: None,
            },
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from(&error)
    }
}
