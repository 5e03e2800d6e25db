//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the [`NotificationPull`] port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::NotificationPull;
use crate::inbound::http::function_key::FunctionKey;

/// Dependency bundle for the pull handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Pull use-case the handlers dispatch to.
    pub pull: Arc<dyn NotificationPull>,
    /// Shared key every request must carry; `None` disables the check.
    pub function_key: Option<FunctionKey>,
}

impl HttpState {
    /// State with the function key check disabled.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use notification_pull::domain::ports::{
    ///     FixtureNotificationSource, FixtureRequestValidator, FixtureUserRepository,
    ///     NoOpDenyList,
    /// };
    /// use notification_pull::domain::{NotificationPullService, PullPorts, PullServiceSettings};
    /// use notification_pull::inbound::http::state::HttpState;
    ///
    /// let service = NotificationPullService::new(
    ///     PullPorts {
    ///         users: Arc::new(FixtureUserRepository),
    ///         validator: Arc::new(FixtureRequestValidator),
    ///         notifications: Arc::new(FixtureNotificationSource),
    ///         deny_list: Arc::new(NoOpDenyList),
    ///     },
    ///     PullServiceSettings::default(),
    /// );
    /// let state = HttpState::new(Arc::new(service));
    /// assert!(state.function_key.is_none());
    /// ```
    pub fn new(pull: Arc<dyn NotificationPull>) -> Self {
        Self {
            pull,
            function_key: None,
        }
    }

    /// Require callers to present `key`.
    #[must_use]
    pub fn with_function_key(mut self, key: FunctionKey) -> Self {
        self.function_key = Some(key);
        self
    }
}
