//! Port for the caller validation service.
//!
//! The validator owns both the decision and the response a rejected caller
//! sees; the pull pipeline never rebuilds it.

use async_trait::async_trait;

use crate::domain::{InboundRequest, PullRequestParameters, ValidationOutcome};

/// Decides whether a pull request may proceed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestValidator: Send + Sync {
    /// Inspect the raw request and parsed parameters.
    async fn validate(
        &self,
        request: &InboundRequest,
        parameters: &PullRequestParameters,
    ) -> ValidationOutcome;
}

/// Fixture validator accepting every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRequestValidator;

#[async_trait]
impl RequestValidator for FixtureRequestValidator {
    async fn validate(
        &self,
        _request: &InboundRequest,
        _parameters: &PullRequestParameters,
    ) -> ValidationOutcome {
        ValidationOutcome::Valid
    }
}
