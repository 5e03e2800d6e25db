//! Service settings loaded via OrthoConfig.
//!
//! Every field can be set from the command line, a configuration file or a
//! `PULL_*` environment variable. Unset fields fall back to the defaults
//! below.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use notification_pull::domain::{DEFAULT_MAX_MESSAGES, DEFAULT_UPSTREAM_TIMEOUT};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DENY_LIST_TTL_SECS: u64 = 3600;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` did not parse as `host:port`.
    #[error("bind_addr `{value}` is not a socket address")]
    InvalidBindAddr {
        /// The rejected value as configured.
        value: String,
    },
    /// `max_messages` was set to zero.
    #[error("max_messages must be at least 1")]
    ZeroMaxMessages,
}

/// Configuration values for the pull service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PULL")]
pub struct PullSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Bound on each upstream call, in milliseconds.
    pub upstream_timeout_ms: Option<u64>,
    /// Maximum messages returned by one pull.
    pub max_messages: Option<usize>,
    /// How long a deny-list entry stays active, in seconds.
    pub deny_list_ttl_secs: Option<u64>,
    /// Shared key callers must present; the check is off when absent.
    pub function_key: Option<String>,
    /// Key for deriving per-user bearer secrets; every request is accepted
    /// when absent.
    pub validation_signing_key: Option<String>,
}

impl fmt::Debug for PullSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("PullSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redact(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("upstream_timeout_ms", &self.upstream_timeout_ms)
            .field("max_messages", &self.max_messages)
            .field("deny_list_ttl_secs", &self.deny_list_ttl_secs)
            .field("function_key", &redact(&self.function_key))
            .field(
                "validation_signing_key",
                &redact(&self.validation_signing_key),
            )
            .finish()
    }
}

impl PullSettings {
    /// Listening address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
            })
    }

    /// Pool size cap, defaulting to 10.
    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Bound on each upstream call, defaulting to five seconds.
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout_ms
            .map_or(DEFAULT_UPSTREAM_TIMEOUT, Duration::from_millis)
    }

    /// Page size for one pull, defaulting to 100.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroMaxMessages`] for a zero page size.
    pub fn max_messages(&self) -> Result<usize, SettingsError> {
        match self.max_messages {
            Some(0) => Err(SettingsError::ZeroMaxMessages),
            Some(limit) => Ok(limit),
            None => Ok(DEFAULT_MAX_MESSAGES),
        }
    }

    /// Deny-list entry lifetime, defaulting to one hour.
    #[must_use]
    pub fn deny_list_ttl(&self) -> chrono::Duration {
        let secs = self
            .deny_list_ttl_secs
            .unwrap_or(DEFAULT_DENY_LIST_TTL_SECS);
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "PULL_BIND_ADDR",
        "PULL_DATABASE_URL",
        "PULL_DB_MAX_CONNECTIONS",
        "PULL_UPSTREAM_TIMEOUT_MS",
        "PULL_MAX_MESSAGES",
        "PULL_DENY_LIST_TTL_SECS",
        "PULL_FUNCTION_KEY",
        "PULL_VALIDATION_SIGNING_KEY",
    ];

    fn load_from_empty_args() -> PullSettings {
        PullSettings::load_from_iter([OsString::from("notification-pull")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(settings.upstream_timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_messages(), Ok(100));
        assert_eq!(settings.deny_list_ttl(), chrono::Duration::hours(1));
        assert_eq!(settings.db_max_connections(), 10);
        assert!(settings.database_url.is_none());
        assert!(settings.function_key.is_none());
        assert!(settings.validation_signing_key.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("PULL_BIND_ADDR", "127.0.0.1:9000"),
            ("PULL_UPSTREAM_TIMEOUT_MS", "250"),
            ("PULL_MAX_MESSAGES", "20"),
            ("PULL_DENY_LIST_TTL_SECS", "60"),
            ("PULL_FUNCTION_KEY", "k3y"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(settings.upstream_timeout(), Duration::from_millis(250));
        assert_eq!(settings.max_messages(), Ok(20));
        assert_eq!(settings.deny_list_ttl(), chrono::Duration::seconds(60));
        assert_eq!(settings.function_key.as_deref(), Some("k3y"));
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let _guard = lock_env(env_with(&[
            ("PULL_BIND_ADDR", "not-an-address"),
            ("PULL_MAX_MESSAGES", "0"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr {
                value: "not-an-address".to_owned()
            })
        );
        assert_eq!(settings.max_messages(), Err(SettingsError::ZeroMaxMessages));
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let _guard = lock_env(env_with(&[("PULL_FUNCTION_KEY", "k3y")]));
        let rendered = format!("{:?}", load_from_empty_args());
        assert!(!rendered.contains("k3y"));
    }
}
