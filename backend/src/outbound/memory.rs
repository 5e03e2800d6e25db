//! In-memory adapters for the user repository and notification source.
//!
//! Used when no database is configured and by integration tests. Both are
//! cheap to clone; clones share state.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    NotificationSource, NotificationSourceError, UserRepository, UserRepositoryError,
};
use crate::domain::{NotificationMessage, PullResult, UserKey};

/// Registration lookup over a shared set of keys.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    keys: Arc<RwLock<HashSet<UserKey>>>,
}

impl InMemoryUserRepository {
    /// Repository pre-populated with `keys`.
    ///
    /// # Examples
    /// ```
    /// use notification_pull::domain::UserKey;
    /// use notification_pull::outbound::memory::InMemoryUserRepository;
    ///
    /// let repo = InMemoryUserRepository::with_keys([UserKey::from_raw("u1.1.2")]);
    /// assert!(repo.register(UserKey::from_raw("u2.1.2")).is_ok());
    /// ```
    pub fn with_keys(keys: impl IntoIterator<Item = UserKey>) -> Self {
        Self {
            keys: Arc::new(RwLock::new(keys.into_iter().collect())),
        }
    }

    /// Mark `key` as registered.
    pub fn register(&self, key: UserKey) -> Result<(), UserRepositoryError> {
        self.keys
            .write()
            .map_err(|_| UserRepositoryError::query("user set lock poisoned"))?
            .insert(key);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists(&self, key: &UserKey) -> Result<bool, UserRepositoryError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| UserRepositoryError::query("user set lock poisoned"))?;
        Ok(keys.contains(key))
    }
}

/// Notification store over a shared list of published messages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSource {
    messages: Arc<RwLock<Vec<NotificationMessage>>>,
}

impl InMemoryNotificationSource {
    /// Source pre-populated with `messages`, in any order.
    pub fn with_messages(messages: impl IntoIterator<Item = NotificationMessage>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(messages.into_iter().collect())),
        }
    }

    /// Publish one more message.
    pub fn publish(&self, message: NotificationMessage) -> Result<(), NotificationSourceError> {
        self.messages
            .write()
            .map_err(|_| NotificationSourceError::query("message list lock poisoned"))?
            .push(message);
        Ok(())
    }
}

#[async_trait]
impl NotificationSource for InMemoryNotificationSource {
    async fn fetch_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<PullResult, NotificationSourceError> {
        let messages = self
            .messages
            .read()
            .map_err(|_| NotificationSourceError::query("message list lock poisoned"))?;
        Ok(PullResult::select_since(
            messages.iter().cloned(),
            since,
            limit,
        ))
    }
}
