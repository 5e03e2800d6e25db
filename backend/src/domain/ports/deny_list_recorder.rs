//! Port recording rejected callers.

use async_trait::async_trait;

use crate::domain::DenyListEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by deny-list adapters.
    pub enum DenyListError {
        /// The entry could not be stored.
        Storage { message: String } => "deny list storage failed: {message}",
    }
}

/// Side-effecting hook invoked once per rejected request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DenyListRecorder: Send + Sync {
    /// Record a rejected request.
    async fn record(&self, entry: &DenyListEntry) -> Result<(), DenyListError>;
}

/// Recorder that drops every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDenyList;

#[async_trait]
impl DenyListRecorder for NoOpDenyList {
    async fn record(&self, _entry: &DenyListEntry) -> Result<(), DenyListError> {
        Ok(())
    }
}
