//! Driving port for the pull use-case.
//!
//! The HTTP adapter calls this port with already-parsed parameters and maps
//! the returned [`PullError`] to a response. Handler tests can substitute a
//! mock instead of wiring the full pipeline.

use async_trait::async_trait;

use crate::domain::{InboundRequest, PullError, PullRequestParameters, PullResult};

/// Domain use-case port for pulling notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPull: Send + Sync {
    /// Run validate, existence check and fetch for one request.
    async fn pull(
        &self,
        request: &InboundRequest,
        parameters: PullRequestParameters,
    ) -> Result<PullResult, PullError>;

    /// Record a call that used an unsupported method and return the error
    /// to answer with.
    async fn reject_unsupported_method(&self, request: &InboundRequest) -> PullError;
}
