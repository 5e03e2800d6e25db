//! PostgreSQL-backed `NotificationSource` implementation using Diesel ORM.
//!
//! The query pushes the boundary rules into SQL: `created > since`, ordered
//! by `(created, id)`. One row past the page size is loaded so
//! [`PullResult::page_cut`] can see whether the page would end inside a
//! group of equal `created` values; a group larger than the page is then
//! reloaded whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::{NotificationMessage, PageCut, PullResult};
use crate::domain::ports::{NotificationSource, NotificationSourceError};

use super::error_mapping::StoreFailure;
use super::models::NotificationMessageRow;
use super::pool::DbPool;
use super::schema::notification_messages;

/// Diesel-backed implementation of the `NotificationSource` port.
#[derive(Clone)]
pub struct DieselNotificationSource {
    pool: DbPool,
}

impl DieselNotificationSource {
    /// Create a new source with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: impl Into<StoreFailure>) -> NotificationSourceError {
    match failure.into() {
        StoreFailure::Overloaded(message) | StoreFailure::Connection(message) => {
            NotificationSourceError::connection(message)
        }
        StoreFailure::Query(message) => NotificationSourceError::query(message),
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl NotificationSource for DieselNotificationSource {
    async fn fetch_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<PullResult, NotificationSourceError> {
        let mut conn = self.pool.get().await.map_err(to_port_error)?;

        let rows: Vec<NotificationMessageRow> = notification_messages::table
            .filter(notification_messages::created.gt(since))
            .order((
                notification_messages::created.asc(),
                notification_messages::id.asc(),
            ))
            .limit(sql_limit(limit.saturating_add(1)))
            .select(NotificationMessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(to_port_error)?;
        let mut page: Vec<NotificationMessage> = rows.into_iter().map(Into::into).collect();

        match PullResult::page_cut(&page, limit) {
            PageCut::Keep(count) => page.truncate(count),
            PageCut::WholeGroup(created) => {
                let group: Vec<NotificationMessageRow> = notification_messages::table
                    .filter(notification_messages::created.eq(created))
                    .order(notification_messages::id.asc())
                    .select(NotificationMessageRow::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(to_port_error)?;
                debug!(count = group.len(), limit, "page extended to a whole timestamp group");
                page = group.into_iter().map(Into::into).collect();
            }
        }

        Ok(PullResult::from_page(page, since))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::PoolError;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::exhausted("timed out"))]
    #[case(PoolError::checkout("refused"))]
    fn pool_failures_are_connection_errors(#[case] error: PoolError) {
        assert!(matches!(
            to_port_error(error),
            NotificationSourceError::Connection { .. }
        ));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(100, 100)]
    #[case(usize::MAX, i64::MAX)]
    fn limit_is_clamped_for_sql(#[case] limit: usize, #[case] expected: i64) {
        assert_eq!(sql_limit(limit), expected);
    }
}
