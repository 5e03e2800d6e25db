//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Answers the registration lookup with a single `SELECT EXISTS(...)` over
//! `registered_users`. Pool exhaustion and server connection limits surface
//! as [`UserRepositoryError::TooManyRequests`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserKey;
use crate::domain::ports::{UserRepository, UserRepositoryError};

use super::error_mapping::StoreFailure;
use super::pool::DbPool;
use super::schema::registered_users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: impl Into<StoreFailure>) -> UserRepositoryError {
    match failure.into() {
        StoreFailure::Overloaded(message) => UserRepositoryError::too_many_requests(message),
        StoreFailure::Connection(message) => UserRepositoryError::connection(message),
        StoreFailure::Query(message) => UserRepositoryError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn exists(&self, key: &UserKey) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(to_port_error)?;

        diesel::select(diesel::dsl::exists(
            registered_users::table.filter(registered_users::user_key.eq(key.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(to_port_error)
    }
}
