//! Notification pull handlers.
//!
//! ```text
//! GET  /api/Notification/Pull/{userUuid}/{userMajor}/{userMinor}/{lastNotificationTime}
//! POST /api/Notification/Pull {"userUuid":"...","userMajor":"...","userMinor":"...","lastNotificationTime":"..."}
//! ```
//!
//! Both routes build the same [`PullRequestParameters`] and hand them to the
//! [`NotificationPull`](crate::domain::ports::NotificationPull) port. Any
//! other verb on either route answers `400 Not Supported` and is recorded on
//! the deny list.

use actix_web::{HttpRequest, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, InboundRequest, PullError, PullRequestParameters, PullResult};
use crate::inbound::http::function_key::require_function_key;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_body_error, parse_rfc3339_timestamp, require_field,
};

const USER_UUID: FieldName = FieldName::new("userUuid");
const USER_MAJOR: FieldName = FieldName::new("userMajor");
const USER_MINOR: FieldName = FieldName::new("userMinor");
const LAST_NOTIFICATION_TIME: FieldName = FieldName::new("lastNotificationTime");

/// Path of the POST route relative to the `/api` scope.
pub const PULL_ROUTE: &str = "/Notification/Pull";
/// Path of the GET route relative to the `/api` scope.
pub const PULL_BY_PATH_ROUTE: &str =
    "/Notification/Pull/{userUuid}/{userMajor}/{userMinor}/{lastNotificationTime}";

/// Path segments of the GET route.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Path)]
pub struct PullPathParams {
    /// Device-issued user UUID.
    pub user_uuid: String,
    /// Beacon major value.
    pub user_major: String,
    /// Beacon minor value.
    pub user_minor: String,
    /// Watermark from the previous pull, RFC 3339.
    #[param(example = "2024-01-01T00:00:00Z")]
    pub last_notification_time: String,
}

impl TryFrom<PullPathParams> for PullRequestParameters {
    type Error = Error;

    fn try_from(value: PullPathParams) -> Result<Self, Self::Error> {
        let since = parse_rfc3339_timestamp(value.last_notification_time, LAST_NOTIFICATION_TIME)?;
        Ok(Self::new(
            value.user_uuid,
            value.user_major,
            value.user_minor,
            since,
        ))
    }
}

/// JSON body of the POST route.
///
/// Field names are camelCase; PascalCase spellings are accepted as well so
/// older clients keep working.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestBody {
    #[serde(alias = "UserUuid")]
    pub user_uuid: Option<String>,
    #[serde(alias = "UserMajor")]
    pub user_major: Option<String>,
    #[serde(alias = "UserMinor")]
    pub user_minor: Option<String>,
    #[serde(alias = "LastNotificationTime")]
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub last_notification_time: Option<String>,
}

impl TryFrom<PullRequestBody> for PullRequestParameters {
    type Error = Error;

    fn try_from(value: PullRequestBody) -> Result<Self, Self::Error> {
        let user_uuid = require_field(value.user_uuid, USER_UUID)?;
        let user_major = require_field(value.user_major, USER_MAJOR)?;
        let user_minor = require_field(value.user_minor, USER_MINOR)?;
        let raw_since = require_field(value.last_notification_time, LAST_NOTIFICATION_TIME)?;
        let since = parse_rfc3339_timestamp(raw_since, LAST_NOTIFICATION_TIME)?;
        Ok(Self::new(user_uuid, user_major, user_minor, since))
    }
}

/// Mount the pull routes. Call inside the `/api` scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use notification_pull::inbound::http::notifications;
///
/// let app = App::new().service(web::scope("/api").configure(notifications::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(PULL_BY_PATH_ROUTE)
            .route(web::get().to(pull_by_path))
            .default_service(web::to(unsupported_method)),
    )
    .service(
        web::resource(PULL_ROUTE)
            .route(web::post().to(pull_by_body))
            .default_service(web::to(unsupported_method)),
    );
}

/// Transport-neutral view of `req` for the validator and the deny list.
pub(crate) fn inbound_request(req: &HttpRequest) -> InboundRequest {
    let mut inbound = InboundRequest::new(req.method().as_str(), req.path());
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            inbound = inbound.with_header(name.as_str(), value);
        }
    }
    // Socket peer only: `Forwarded`/`X-Forwarded-For` are caller-controlled.
    if let Some(peer) = req.peer_addr() {
        inbound = inbound.with_peer(peer.ip().to_string());
    }
    inbound
}

async fn dispatch(
    state: &HttpState,
    inbound: InboundRequest,
    parameters: PullRequestParameters,
) -> Result<web::Json<PullResult>, PullError> {
    state
        .pull
        .pull(&inbound, parameters)
        .await
        .map(web::Json)
}

/// Pull messages using path parameters.
#[utoipa::path(
    get,
    path = "/api/Notification/Pull/{userUuid}/{userMajor}/{userMinor}/{lastNotificationTime}",
    params(PullPathParams),
    responses(
        (status = 200, description = "Messages newer than the watermark", body = PullResult),
        (status = 400, description = "Malformed timestamp, rejected caller or already registered user"),
        (status = 401, description = "Missing or invalid credentials", body = Error),
        (status = 500, description = "Upstream failure", body = Error),
        (status = 503, description = "User store overloaded; retry later")
    ),
    tags = ["notifications"],
    operation_id = "pullNotificationsByPath"
)]
pub async fn pull_by_path(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<PullPathParams>,
) -> actix_web::Result<web::Json<PullResult>> {
    info!(method = %req.method(), route = "pull_by_path", "pull request received");
    require_function_key(state.function_key.as_ref(), &req)?;
    let parameters = PullRequestParameters::try_from(path.into_inner()).map_err(PullError::from)?;
    Ok(dispatch(&state, inbound_request(&req), parameters).await?)
}

/// Pull messages using a JSON body.
#[utoipa::path(
    post,
    path = "/api/Notification/Pull",
    request_body = PullRequestBody,
    responses(
        (status = 200, description = "Messages newer than the watermark", body = PullResult),
        (status = 400, description = "Malformed body, rejected caller or already registered user"),
        (status = 401, description = "Missing or invalid credentials", body = Error),
        (status = 500, description = "Upstream failure", body = Error),
        (status = 503, description = "User store overloaded; retry later")
    ),
    tags = ["notifications"],
    operation_id = "pullNotifications"
)]
pub async fn pull_by_body(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> actix_web::Result<web::Json<PullResult>> {
    info!(method = %req.method(), route = "pull_by_body", "pull request received");
    require_function_key(state.function_key.as_ref(), &req)?;
    let payload: PullRequestBody = serde_json::from_slice(&body)
        .map_err(|err| PullError::from(invalid_body_error(&err)))?;
    let parameters = PullRequestParameters::try_from(payload).map_err(PullError::from)?;
    Ok(dispatch(&state, inbound_request(&req), parameters).await?)
}

/// Fallback for any verb the pull routes do not serve.
pub async fn unsupported_method(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> actix_web::Result<web::Json<PullResult>> {
    info!(method = %req.method(), path = req.path(), "unsupported pull method");
    require_function_key(state.function_key.as_ref(), &req)?;
    let error = state
        .pull
        .reject_unsupported_method(&inbound_request(&req))
        .await;
    Err(error.into())
}
