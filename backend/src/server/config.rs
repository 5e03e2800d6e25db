//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use notification_pull::domain::PullServiceSettings;
use notification_pull::inbound::http::function_key::FunctionKey;
use notification_pull::outbound::persistence::DbPool;
use notification_pull::outbound::validation::BearerSecretValidator;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) pull: PullServiceSettings,
    pub(crate) deny_list_ttl: chrono::Duration,
    pub(crate) function_key: Option<FunctionKey>,
    pub(crate) validator: Option<BearerSecretValidator>,
}

impl ServerConfig {
    /// Configuration with in-memory adapters, no validation and no function
    /// key.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            pull: PullServiceSettings::default(),
            deny_list_ttl: chrono::Duration::hours(1),
            function_key: None,
            validator: None,
        }
    }

    /// Attach a database connection pool; the user repository and
    /// notification source then use PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_pull_settings(mut self, pull: PullServiceSettings) -> Self {
        self.pull = pull;
        self
    }

    #[must_use]
    pub fn with_deny_list_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.deny_list_ttl = ttl;
        self
    }

    /// Require callers to present `key`.
    #[must_use]
    pub fn with_function_key(mut self, key: FunctionKey) -> Self {
        self.function_key = Some(key);
        self
    }

    /// Validate callers with per-user bearer secrets.
    #[must_use]
    pub fn with_validator(mut self, validator: BearerSecretValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
