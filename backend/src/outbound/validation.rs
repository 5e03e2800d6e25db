//! Bearer-secret request validator.
//!
//! Each device derives its secret as `hex(sha256(signing_key ":" user_key))`
//! and sends it as `Authorization: Bearer <secret>`. Identity fields are
//! checked first; a blank field answers `400` with the JSON error envelope,
//! a missing or wrong secret answers `401` with an empty body.

use async_trait::async_trait;
use serde_json::json;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::RequestValidator;
use crate::domain::{
    Error, InboundRequest, PullRequestParameters, Rejection, UserKey, ValidationOutcome,
};

const AUTHORIZATION: &str = "authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// Errors raised when constructing a [`BearerSecretValidator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerSecretError {
    /// The signing key was empty.
    #[error("validation signing key must not be empty")]
    EmptySigningKey,
}

/// Validator checking a per-user secret derived from a shared signing key.
#[derive(Clone)]
pub struct BearerSecretValidator {
    signing_key: Zeroizing<String>,
}

impl std::fmt::Debug for BearerSecretValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerSecretValidator")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl BearerSecretValidator {
    /// Build a validator for `signing_key`.
    ///
    /// # Examples
    /// ```
    /// use notification_pull::domain::UserKey;
    /// use notification_pull::outbound::validation::BearerSecretValidator;
    ///
    /// let validator = BearerSecretValidator::new("signing-key").expect("valid key");
    /// let secret = validator.expected_secret(&UserKey::from_raw("u1.1.2"));
    /// assert_eq!(secret.len(), 64);
    /// ```
    pub fn new(signing_key: impl Into<String>) -> Result<Self, BearerSecretError> {
        let signing_key = Zeroizing::new(signing_key.into());
        if signing_key.is_empty() {
            return Err(BearerSecretError::EmptySigningKey);
        }
        Ok(Self { signing_key })
    }

    /// Secret a device with `key` is expected to present.
    pub fn expected_secret(&self, key: &UserKey) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_key.as_bytes());
        hasher.update(b":");
        hasher.update(key.as_ref().as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn blank_field(parameters: &PullRequestParameters) -> Option<&'static str> {
    [
        ("userUuid", parameters.user_uuid()),
        ("userMajor", parameters.user_major()),
        ("userMinor", parameters.user_minor()),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
}

fn blank_field_rejection(field: &'static str) -> Rejection {
    let envelope = Error::invalid_request(format!("{field} must not be blank"))
        .with_details(json!({ "field": field, "code": "blank_field" }));
    match serde_json::to_value(&envelope) {
        Ok(body) => Rejection::json(400, body),
        Err(_) => Rejection::empty(400),
    }
}

fn bearer_token(request: &InboundRequest) -> Option<&str> {
    request
        .header(AUTHORIZATION)
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl RequestValidator for BearerSecretValidator {
    async fn validate(
        &self,
        request: &InboundRequest,
        parameters: &PullRequestParameters,
    ) -> ValidationOutcome {
        if let Some(field) = blank_field(parameters) {
            debug!(field, "blank identity field");
            return ValidationOutcome::Invalid(blank_field_rejection(field));
        }

        let Some(token) = bearer_token(request) else {
            debug!("missing bearer token");
            return ValidationOutcome::Invalid(Rejection::empty(401));
        };

        let expected = self.expected_secret(&parameters.user_key());
        if bool::from(expected.as_bytes().ct_eq(token.as_bytes())) {
            ValidationOutcome::Valid
        } else {
            debug!("bearer token mismatch");
            ValidationOutcome::Invalid(Rejection::empty(401))
        }
    }
}
