//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (user repository, request validator, notification source,
//! deny-list recorder) expose strongly typed errors so adapters map their
//! failures into predictable variants. The driving port
//! ([`NotificationPull`]) is what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod deny_list_recorder;
mod notification_pull;
mod notification_source;
mod request_validator;
mod user_repository;

#[cfg(test)]
pub use deny_list_recorder::MockDenyListRecorder;
pub use deny_list_recorder::{DenyListError, DenyListRecorder, NoOpDenyList};
#[cfg(test)]
pub use notification_pull::MockNotificationPull;
pub use notification_pull::NotificationPull;
#[cfg(test)]
pub use notification_source::MockNotificationSource;
pub use notification_source::{
    FixtureNotificationSource, NotificationSource, NotificationSourceError,
};
#[cfg(test)]
pub use request_validator::MockRequestValidator;
pub use request_validator::{FixtureRequestValidator, RequestValidator};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
