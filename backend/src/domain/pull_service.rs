//! Notification pull service implementing the [`NotificationPull`] port.
//!
//! Runs validate → existence check → fetch for one request. Each stage can
//! short-circuit and nothing after the first failure executes. Rejections
//! that indicate abuse are recorded on the deny list; transient upstream
//! failures are not.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    DenyListRecorder, NotificationPull, NotificationSource, NotificationSourceError,
    RequestValidator, UserRepository, UserRepositoryError,
};
use crate::domain::{
    DenyListEntry, DenyReason, InboundRequest, PullError, PullRequestParameters, PullResult,
    ValidationOutcome,
};

/// Default bound applied to each upstream call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);
/// Default page size for a single pull.
pub const DEFAULT_MAX_MESSAGES: usize = 100;

/// Tunables for [`NotificationPullService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullServiceSettings {
    /// Bound applied to the existence check and to the fetch.
    pub upstream_timeout: Duration,
    /// Maximum number of messages returned by one pull.
    pub max_messages: usize,
}

impl Default for PullServiceSettings {
    fn default() -> Self {
        Self {
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }
}

/// Parameter object bundling the driven ports the service depends on.
#[derive(Clone)]
pub struct PullPorts {
    /// Registration lookup for the existence check.
    pub users: Arc<dyn UserRepository>,
    /// Caller validation run before anything else.
    pub validator: Arc<dyn RequestValidator>,
    /// Published message store.
    pub notifications: Arc<dyn NotificationSource>,
    /// Sink for rejected callers.
    pub deny_list: Arc<dyn DenyListRecorder>,
}

/// Pull pipeline over injected collaborators.
#[derive(Clone)]
pub struct NotificationPullService {
    users: Arc<dyn UserRepository>,
    validator: Arc<dyn RequestValidator>,
    notifications: Arc<dyn NotificationSource>,
    deny_list: Arc<dyn DenyListRecorder>,
    settings: PullServiceSettings,
}

impl NotificationPullService {
    /// Create a service from its ports and settings.
    pub fn new(ports: PullPorts, settings: PullServiceSettings) -> Self {
        let PullPorts {
            users,
            validator,
            notifications,
            deny_list,
        } = ports;
        Self {
            users,
            validator,
            notifications,
            deny_list,
            settings,
        }
    }

    async fn deny(&self, reason: DenyReason, request: &InboundRequest) {
        let entry = DenyListEntry::from_request(reason, request);
        warn!(
            reason = %reason,
            method = entry.method(),
            path = entry.path(),
            peer = entry.peer(),
            "pull request rejected"
        );
        // The response is already decided; a failed or stalled write only
        // gets logged.
        match self
            .bounded("deny-list record", self.deny_list.record(&entry))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(kind = err.kind(), error = %err, reason = %reason, "failed to record deny-list entry");
            }
            Err(_) => {
                error!(reason = %reason, "deny-list record abandoned");
            }
        }
    }

    async fn bounded<F>(&self, stage: &'static str, call: F) -> Result<F::Output, PullError>
    where
        F: Future + Send,
    {
        let limit = self.settings.upstream_timeout;
        tokio::time::timeout(limit, call).await.map_err(|_| {
            error!(stage, timeout_ms = limit.as_millis(), "upstream call timed out");
            PullError::upstream_failure(format!(
                "{stage} timed out after {} ms",
                limit.as_millis()
            ))
        })
    }

    fn map_user_repository_error(err: UserRepositoryError) -> PullError {
        let kind = err.kind();
        match err {
            UserRepositoryError::TooManyRequests { message } => {
                warn!(kind, %message, "user repository overloaded");
                PullError::UpstreamOverload
            }
            UserRepositoryError::Connection { message } => {
                error!(kind, %message, "user repository unavailable");
                PullError::upstream_failure(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                error!(kind, %message, "user repository query failed");
                PullError::upstream_failure(format!("user repository error: {message}"))
            }
        }
    }

    fn map_source_error(err: NotificationSourceError) -> PullError {
        error!(kind = err.kind(), error = %err, "notification fetch failed");
        PullError::upstream_failure(err.to_string())
    }
}

#[async_trait]
impl NotificationPull for NotificationPullService {
    async fn pull(
        &self,
        request: &InboundRequest,
        parameters: PullRequestParameters,
    ) -> Result<PullResult, PullError> {
        if let ValidationOutcome::Invalid(rejection) =
            self.validator.validate(request, &parameters).await
        {
            self.deny(DenyReason::ValidationFailed, request).await;
            return Err(PullError::ValidationFailed(rejection));
        }

        let key = parameters.user_key();
        let registered = self
            .bounded("user existence check", self.users.exists(&key))
            .await?
            .map_err(Self::map_user_repository_error)?;
        if registered {
            self.deny(DenyReason::AlreadyRegistered, request).await;
            return Err(PullError::AlreadyRegistered { key });
        }

        let since = parameters.last_notification_time();
        let result = self
            .bounded(
                "notification fetch",
                self.notifications
                    .fetch_since(since, self.settings.max_messages),
            )
            .await?
            .map_err(Self::map_source_error)?;
        debug!(
            count = result.messages.len(),
            watermark = %result.last_notification_time,
            "notifications fetched"
        );
        Ok(result)
    }

    async fn reject_unsupported_method(&self, request: &InboundRequest) -> PullError {
        self.deny(DenyReason::UnsupportedMethod, request).await;
        PullError::UnsupportedMethod {
            method: request.method().to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "pull_service_tests.rs"]
mod tests;
