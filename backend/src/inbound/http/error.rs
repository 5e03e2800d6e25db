//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error types HTTP-agnostic while allowing Actix
//! handlers to turn failures into consistent responses. [`Error`] renders as
//! the JSON envelope; [`PullError`] follows the pull contract, where several
//! outcomes answer with an empty or plain-text body instead.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, PullError, RejectionBody, TRACE_ID_HEADER};

/// Body sent for methods other than GET/POST on the pull routes.
pub const NOT_SUPPORTED_BODY: &str = "Not Supported";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn rejection_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or_else(|_| {
        error!(status, "validator produced an invalid status code");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn rejection_response(mut builder: HttpResponseBuilder, body: &RejectionBody) -> HttpResponse {
    match body {
        RejectionBody::Empty => builder.finish(),
        RejectionBody::Text(text) => builder
            .content_type(ContentType::plaintext())
            .body(text.clone()),
        RejectionBody::Json(value) => builder.json(value),
    }
}

impl ResponseError for PullError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMethod { .. }
            | Self::AlreadyRegistered { .. }
            | Self::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(rejection) => rejection_status(rejection.status()),
            Self::UpstreamOverload => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            Self::UnsupportedMethod { .. } => HttpResponse::build(status)
                .content_type(ContentType::plaintext())
                .body(NOT_SUPPORTED_BODY),
            Self::ValidationFailed(rejection) => {
                rejection_response(HttpResponse::build(status), rejection.body())
            }
            Self::AlreadyRegistered { .. } | Self::UpstreamOverload => {
                HttpResponse::build(status).finish()
            }
            Self::UpstreamFailure { message } => {
                error!(%message, "pull failed upstream");
                Error::internal("upstream failure").error_response()
            }
            Self::MalformedRequest { message, details } => {
                let envelope = Error::invalid_request(message.clone());
                match details {
                    Some(details) => envelope.with_details(details.clone()),
                    None => envelope,
                }
                .error_response()
            }
        }
    }
}

impl From<Error> for PullError {
    fn from(err: Error) -> Self {
        Self::MalformedRequest {
            message: err.message().to_owned(),
            details: err.details().cloned(),
        }
    }
}

#[cfg(test)]
mod tests;
