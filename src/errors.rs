//! Error handling for the Insight Atlas engine
//!
//! All request-time failures come out of the intake gate; the scoring stages
//! are total functions. Configuration-integrity faults (a weight table or
//! narrative rule referencing something that does not exist) are raised once,
//! at engine construction, never per request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the engine and its CLI/HTTP shell
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Consent missing: intake requires explicit consent before analysis")]
    ConsentMissing,

    #[error("Survey incomplete: missing answers for {missing:?}")]
    SurveyIncomplete { missing: Vec<String> },

    #[error("Survey answer out of range: {key} = {value} (expected an integer in 1..=5)")]
    SurveyOutOfRange {
        key: String,
        value: serde_json::Value,
    },

    #[error("Free text too long: {len} characters exceeds the {max} character limit")]
    FreeTextTooLong { len: usize, max: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result with EngineError
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a configuration-integrity error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Name of the intake field an error is attributable to, for structured
    /// rejections. Non-validation errors have no field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EngineError::ConsentMissing => Some("consent"),
            EngineError::SurveyIncomplete { .. } | EngineError::SurveyOutOfRange { .. } => {
                Some("survey")
            }
            EngineError::FreeTextTooLong { .. } => Some("free_text"),
            _ => None,
        }
    }

    /// True for errors raised by the intake gate (the caller can correct and
    /// resubmit); false for engine-side faults.
    pub fn is_validation(&self) -> bool {
        self.field().is_some()
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "field": self.field(),
        });

        (status, Json(body)).into_response()
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::io("io_operation", err)
    }
}
