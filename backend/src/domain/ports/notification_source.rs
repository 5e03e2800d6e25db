//! Port for the published notification store.
//!
//! Every adapter applies the same boundary rules as
//! [`PullResult::select_since`]: messages created strictly after `since`,
//! ordered by `(created, id)`, at most `limit` of them, watermark at the last
//! returned message or `since` when the page is empty.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::PullResult;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification source adapters.
    pub enum NotificationSourceError {
        /// Store connection could not be established.
        Connection { message: String } => "notification source connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "notification source query failed: {message}",
    }
}

/// Read-only query over published notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Fetch messages newer than `since` plus the next watermark.
    async fn fetch_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<PullResult, NotificationSourceError>;
}

/// Fixture source with nothing published.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationSource;

#[async_trait]
impl NotificationSource for FixtureNotificationSource {
    async fn fetch_since(
        &self,
        since: DateTime<Utc>,
        _limit: usize,
    ) -> Result<PullResult, NotificationSourceError> {
        Ok(PullResult::from_page(Vec::new(), since))
    }
}
