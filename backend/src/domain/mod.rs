//! Domain primitives, ports and the pull use-case.
//!
//! Purpose: keep the notification pull pipeline independent of transport and
//! storage. Inbound adapters translate requests into
//! [`PullRequestParameters`] and [`InboundRequest`]; outbound adapters
//! implement the driven ports in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - PullError — failure taxonomy for a single pull.
//! - NotificationPullService — the validate → existence check → fetch
//!   pipeline.

pub mod deny_list;
pub mod error;
pub mod notification;
pub mod ports;
pub mod pull_error;
pub mod pull_service;
pub mod request;
pub mod trace_id;

pub use self::deny_list::{DenyListEntry, DenyReason};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::notification::{
    NotificationMessage, PageCut, PullRequestParameters, PullResult, UserKey,
};
pub use self::pull_error::PullError;
pub use self::pull_service::{
    DEFAULT_MAX_MESSAGES, DEFAULT_UPSTREAM_TIMEOUT, NotificationPullService, PullPorts,
    PullServiceSettings,
};
pub use self::request::{InboundRequest, Rejection, RejectionBody, ValidationOutcome};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use notification_pull::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("missing function key"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
