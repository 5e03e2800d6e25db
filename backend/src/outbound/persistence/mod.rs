//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user repository and notification source
//! ports backed by PostgreSQL through `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures are classified once
//!   and mapped onto each port's error enum.
//!
//! # Example
//!
//! ```no_run
//! use notification_pull::outbound::persistence::{
//!     DbPool, DieselNotificationSource, DieselUserRepository, PoolConfig,
//! };
//!
//! # async fn wire() -> Result<(), notification_pull::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pull")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let notifications = DieselNotificationSource::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_notification_source;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_notification_source::DieselNotificationSource;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
