//! Port for the user registration lookup and its errors.

use async_trait::async_trait;

use crate::domain::UserKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The backing store is rate limiting or out of capacity.
        TooManyRequests { message: String } => "user repository is throttling requests: {message}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Registration lookup backed by a remote store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether a user with this key is already registered.
    async fn exists(&self, key: &UserKey) -> Result<bool, UserRepositoryError>;
}

/// Fixture repository that knows no users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn exists(&self, _key: &UserKey) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }
}
