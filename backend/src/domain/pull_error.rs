//! Outcomes that end a pull before a result is produced.
//!
//! Every failure is resolved at the dispatcher boundary; see
//! `inbound::http::error` for the status and body each variant maps to.

use serde_json::Value;

use super::{Rejection, UserKey};

/// Failure taxonomy for the pull pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PullError {
    /// HTTP verb other than GET/POST on the respective route.
    #[error("method {method} is not supported")]
    UnsupportedMethod {
        /// Method the caller used.
        method: String,
    },
    /// The validator rejected the request; its response is returned verbatim.
    #[error("request failed validation with status {}", .0.status())]
    ValidationFailed(Rejection),
    /// The existence check found the user already registered.
    #[error("user {key} is already registered")]
    AlreadyRegistered {
        /// Key the existence check ran against.
        key: UserKey,
    },
    /// The backing store signalled overload; the caller may retry.
    #[error("user repository is overloaded")]
    UpstreamOverload,
    /// Any other backing-store or fetch failure, including timeouts.
    #[error("upstream call failed: {message}")]
    UpstreamFailure {
        /// Diagnostic message; never shown to callers.
        message: String,
    },
    /// The request body or path could not be parsed.
    #[error("malformed request: {message}")]
    MalformedRequest {
        /// Caller-facing description.
        message: String,
        /// Field-level context.
        details: Option<Value>,
    },
}

impl PullError {
    /// Build an [`PullError::UpstreamFailure`].
    pub fn upstream_failure(message: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
        }
    }

    /// Build a [`PullError::MalformedRequest`] with field details.
    pub fn malformed(message: impl Into<String>, details: Value) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            details: Some(details),
        }
    }
}
