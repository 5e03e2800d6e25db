//! Shared Diesel and pool error classification for the pull adapters.
//!
//! Each adapter maps a [`StoreFailure`] onto its own port error, so the
//! overload and connection rules live in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Server messages PostgreSQL emits when it is out of connection slots.
const OVERLOAD_MARKERS: [&str; 3] = [
    "too many clients",
    "too many connections",
    "remaining connection slots are reserved",
];

/// Whether a driver or server message signals connection exhaustion.
pub(crate) fn is_overload_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    OVERLOAD_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Coarse failure class shared by every store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Overloaded(String),
    Connection(String),
    Query(String),
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Exhausted { message } => Self::Overloaded(message),
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(_, info) if is_overload_message(info.message()) => {
                Self::Overloaded("database connection limit reached".to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            _ => Self::Query("database error".to_owned()),
        }
    }
}
