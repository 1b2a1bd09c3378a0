use crate::dispatcher::HandlerResponse;
use serde_json::json;
use std::fmt;

/// Status every unimplemented operation answers with.
pub const NOT_IMPLEMENTED_STATUS: u16 = 500;

/// Message every unimplemented operation answers with.
pub const NOT_IMPLEMENTED_MESSAGE: &str = "Not implemented";

/// The declared failure kinds of an operation entry point
///
/// A handler either returns a value of its response type or fails with one
/// of these. Generated stubs always fail with [`OperationError::NotImplemented`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// No real logic has been substituted into the generated stub yet.
    NotImplemented,
    /// The request body or parameters were rejected.
    Validation {
        /// Human readable reason
        message: String,
    },
    /// The addressed resource does not exist.
    NotFound {
        /// Human readable reason
        message: String,
    },
    /// The request conflicts with the current state of the resource.
    Conflict {
        /// Human readable reason
        message: String,
    },
    /// The runtime could not produce a response: no entry point, a panic, or
    /// an unserializable response value.
    Internal {
        /// Human readable reason
        message: String,
    },
}

impl OperationError {
    pub fn not_implemented() -> Self {
        OperationError::NotImplemented
    }

    pub fn validation(message: impl Into<String>) -> Self {
        OperationError::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        OperationError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        OperationError::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        OperationError::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code for this error kind.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            OperationError::NotImplemented => NOT_IMPLEMENTED_STATUS,
            OperationError::Validation { .. } => 400,
            OperationError::NotFound { .. } => 404,
            OperationError::Conflict { .. } => 409,
            OperationError::Internal { .. } => 500,
        }
    }

    /// Stable snake_case tag written into the response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::NotImplemented => "not_implemented",
            OperationError::Validation { .. } => "validation",
            OperationError::NotFound { .. } => "not_found",
            OperationError::Conflict { .. } => "conflict",
            OperationError::Internal { .. } => "internal",
        }
    }

    /// Render as a JSON error response: `{"error": <message>, "kind": <kind>}`.
    #[must_use]
    pub fn into_response(self) -> HandlerResponse {
        HandlerResponse::json(
            self.status(),
            json!({ "error": self.to_string(), "kind": self.kind() }),
        )
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationError::NotImplemented => f.write_str(NOT_IMPLEMENTED_MESSAGE),
            OperationError::Validation { message }
            | OperationError::NotFound { message }
            | OperationError::Conflict { message }
            | OperationError::Internal { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for OperationError {}
