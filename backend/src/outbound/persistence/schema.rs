//! Diesel table definitions for the pull tables.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Users that completed registration; keyed by `uuid.major.minor`.
    registered_users (user_key) {
        user_key -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published notification messages.
    notification_messages (id) {
        id -> Uuid,
        title -> Varchar,
        message -> Text,
        /// Publication time; pulls page by this column.
        created -> Timestamptz,
    }
}
