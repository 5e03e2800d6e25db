//! Tests for HTTP error mapping.

use super::*;
use crate::domain::{Rejection, UserKey};
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "userUuid"}))
}

async fn body_bytes(response: HttpResponse) -> Vec<u8> {
    to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds")
        .to_vec()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no key"), StatusCode::UNAUTHORIZED)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn error_responses_include_trace_id_and_payloads(
    #[from(internal_error_case)] internal_error: Error,
    #[from(invalid_request_case)] invalid_request: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());

    let payload = assert_error_response(
        invalid_request,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.details(), Some(&json!({"field": "userUuid"})));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad");
    let payload = assert_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.trace_id(), None);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[rstest]
#[actix_web::test]
async fn unsupported_method_answers_plain_not_supported() {
    let response = PullError::UnsupportedMethod {
        method: "PUT".into(),
    }
    .error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body_bytes(response).await, NOT_SUPPORTED_BODY.as_bytes());
}

#[rstest]
#[case::already_registered(
    PullError::AlreadyRegistered { key: UserKey::from_raw("u1.1.2") },
    StatusCode::BAD_REQUEST
)]
#[case::overload(PullError::UpstreamOverload, StatusCode::SERVICE_UNAVAILABLE)]
#[actix_web::test]
async fn empty_body_outcomes(#[case] error: PullError, #[case] status: StatusCode) {
    let response = error.error_response();
    assert_eq!(response.status(), status);
    assert!(body_bytes(response).await.is_empty());
}

#[rstest]
#[case::empty(Rejection::empty(401), b"".to_vec())]
#[case::text(Rejection::text(403, "blocked"), b"blocked".to_vec())]
#[case::json(
    Rejection::json(400, json!({"code": "invalid_request"})),
    br#"{"code":"invalid_request"}"#.to_vec()
)]
#[actix_web::test]
async fn validator_rejection_is_passed_through(
    #[case] rejection: Rejection,
    #[case] expected_body: Vec<u8>,
) {
    let status = rejection.status();
    let response = PullError::ValidationFailed(rejection).error_response();
    assert_eq!(response.status().as_u16(), status);
    assert_eq!(body_bytes(response).await, expected_body);
}

#[rstest]
#[actix_web::test]
async fn upstream_failure_is_redacted() {
    let response = PullError::upstream_failure("connection refused by 10.0.0.5").error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Error =
        serde_json::from_slice(&body_bytes(response).await).expect("error envelope");
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn malformed_request_keeps_field_details() {
    let response = PullError::malformed(
        "lastNotificationTime must be an RFC 3339 timestamp",
        json!({"field": "lastNotificationTime", "code": "invalid_timestamp"}),
    )
    .error_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Error =
        serde_json::from_slice(&body_bytes(response).await).expect("error envelope");
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "lastNotificationTime", "code": "invalid_timestamp"}))
    );
}

#[test]
fn envelope_errors_convert_to_malformed_requests() {
    let err = Error::invalid_request("missing required field: userUuid")
        .with_details(json!({"field": "userUuid", "code": "missing_field"}));
    let pull: PullError = err.into();
    assert_eq!(
        pull,
        PullError::MalformedRequest {
            message: "missing required field: userUuid".into(),
            details: Some(json!({"field": "userUuid", "code": "missing_field"})),
        }
    );
}
