//! Transport-neutral view of an inbound call and the validator's verdict.

use std::collections::BTreeMap;

use serde_json::Value;

/// Raw request details handed to the validator and the deny-list recorder.
///
/// Header names are stored lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundRequest {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
    peer: Option<String>,
}

impl InboundRequest {
    /// Start a request view for the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Attach a header. Later values for the same name replace earlier ones.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Attach the caller's network address.
    #[must_use]
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }

    /// HTTP method as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path as received.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Caller address, when the transport exposes one.
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }
}

/// Body of a validator-supplied rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionBody {
    /// No body at all.
    Empty,
    /// Plain text body.
    Text(String),
    /// JSON body.
    Json(Value),
}

/// Caller-facing response chosen by the validator; returned verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    status: u16,
    body: RejectionBody,
}

impl Rejection {
    /// Rejection with no body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: RejectionBody::Empty,
        }
    }

    /// Rejection with a plain text body.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: RejectionBody::Text(body.into()),
        }
    }

    /// Rejection with a JSON body.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: RejectionBody::Json(body),
        }
    }

    /// Status code to answer with.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Body to answer with.
    pub fn body(&self) -> &RejectionBody {
        &self.body
    }
}

/// Validator verdict for a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The request may proceed.
    Valid,
    /// The request is rejected with the enclosed response.
    Invalid(Rejection),
}

impl ValidationOutcome {
    /// Whether the request may proceed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}
