//! Internal Diesel row structs. Never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::NotificationMessage;

use super::schema::notification_messages;

/// Row struct for reading from the notification_messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notification_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationMessageRow {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl From<NotificationMessageRow> for NotificationMessage {
    fn from(row: NotificationMessageRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            message: row.message,
            created: row.created,
        }
    }
}
