//! Shared-secret gate in front of the pull routes.
//!
//! When a key is configured, callers must present it either in the
//! `x-functions-key` header or in the `code` query parameter. The check runs
//! before any pull logic, so failures never reach the deny list.

use std::fmt;

use actix_web::{HttpRequest, web};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{ApiResult, Error};

/// Header carrying the function key.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Errors raised when constructing a [`FunctionKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunctionKeyError {
    /// The key was empty or whitespace.
    #[error("function key must not be empty")]
    Empty,
}

/// Configured function key. The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct FunctionKey(Zeroizing<String>);

impl FunctionKey {
    /// Wrap a configured key, rejecting blank values.
    ///
    /// # Examples
    /// ```
    /// use notification_pull::inbound::http::function_key::FunctionKey;
    ///
    /// let key = FunctionKey::new("s3cret").expect("non-empty key");
    /// assert!(key.matches("s3cret"));
    /// assert!(!key.matches("guess"));
    /// assert!(FunctionKey::new("  ").is_err());
    /// ```
    pub fn new(key: impl Into<String>) -> Result<Self, FunctionKeyError> {
        let key = Zeroizing::new(key.into());
        if key.trim().is_empty() {
            return Err(FunctionKeyError::Empty);
        }
        Ok(Self(key))
    }

    /// Compare a presented key in constant time.
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl fmt::Debug for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionKey(<redacted>)")
    }
}

#[derive(Deserialize)]
struct FunctionKeyQuery {
    code: Option<String>,
}

fn presented_key(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req
        .headers()
        .get(FUNCTION_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        return Some(value.to_owned());
    }
    web::Query::<FunctionKeyQuery>::from_query(req.query_string())
        .ok()
        .and_then(|query| query.into_inner().code)
}

/// Enforce the configured key, if any, for this request.
pub(crate) fn require_function_key(
    expected: Option<&FunctionKey>,
    req: &HttpRequest,
) -> ApiResult<()> {
    let Some(expected) = expected else {
        return Ok(());
    };
    match presented_key(req) {
        Some(presented) if expected.matches(&presented) => Ok(()),
        Some(_) => {
            warn!(path = req.path(), "function key mismatch");
            Err(Error::unauthorized("invalid function key"))
        }
        None => {
            warn!(path = req.path(), "function key missing");
            Err(Error::unauthorized("missing function key"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::{fixture, rstest};

    use crate::domain::ErrorCode;

    #[fixture]
    fn key() -> FunctionKey {
        FunctionKey::new("k3y").expect("valid key")
    }

    #[rstest]
    fn disabled_check_accepts_everything() {
        let req = TestRequest::get().uri("/api/Notification/Pull").to_http_request();
        assert!(require_function_key(None, &req).is_ok());
    }

    #[rstest]
    #[case::header(TestRequest::get().insert_header((FUNCTION_KEY_HEADER, "k3y")))]
    #[case::query(TestRequest::get().uri("/api/Notification/Pull?code=k3y"))]
    fn accepts_key_from_header_or_query(key: FunctionKey, #[case] req: TestRequest) {
        let req = req.to_http_request();
        assert!(require_function_key(Some(&key), &req).is_ok());
    }

    #[rstest]
    #[case::missing(TestRequest::get(), "missing function key")]
    #[case::wrong(
        TestRequest::get().insert_header((FUNCTION_KEY_HEADER, "nope")),
        "invalid function key"
    )]
    #[case::wrong_query(TestRequest::get().uri("/p?code=k3"), "invalid function key")]
    fn rejects_missing_or_wrong_key(
        key: FunctionKey,
        #[case] req: TestRequest,
        #[case] message: &str,
    ) {
        let req = req.to_http_request();
        let err = require_function_key(Some(&key), &req).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), message);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", FunctionKey::new("k3y").expect("valid key"));
        assert!(!rendered.contains("k3y"));
    }
}
