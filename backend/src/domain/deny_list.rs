//! Deny-list entries recorded for rejected pull requests.

use std::fmt;

use super::InboundRequest;

/// Why a request was recorded on the deny list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// HTTP verb other than the route's supported one.
    UnsupportedMethod,
    /// The request validator rejected the call.
    ValidationFailed,
    /// The caller identified as an already-registered user.
    AlreadyRegistered,
}

impl DenyReason {
    /// Stable snake-case label used in logs and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedMethod => "unsupported_method",
            Self::ValidationFailed => "validation_failed",
            Self::AlreadyRegistered => "already_registered",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected request as handed to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyListEntry {
    reason: DenyReason,
    method: String,
    path: String,
    peer: Option<String>,
}

impl DenyListEntry {
    /// Capture the parts of `request` the deny list keeps.
    pub fn from_request(reason: DenyReason, request: &InboundRequest) -> Self {
        Self {
            reason,
            method: request.method().to_owned(),
            path: request.path().to_owned(),
            peer: request.peer().map(str::to_owned),
        }
    }

    /// Why the request was rejected.
    pub fn reason(&self) -> DenyReason {
        self.reason
    }

    /// HTTP method of the rejected request.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path of the rejected request.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Caller address, if known.
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    /// Storage key: the caller address, falling back to the request path
    /// when the transport did not expose one.
    pub fn key(&self) -> &str {
        self.peer.as_deref().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_peer_address() {
        let request = InboundRequest::new("PUT", "/api/Notification/Pull").with_peer("10.0.0.1");
        let entry = DenyListEntry::from_request(DenyReason::UnsupportedMethod, &request);
        assert_eq!(entry.key(), "10.0.0.1");
    }

    #[test]
    fn key_falls_back_to_path() {
        let request = InboundRequest::new("PUT", "/api/Notification/Pull");
        let entry = DenyListEntry::from_request(DenyReason::UnsupportedMethod, &request);
        assert_eq!(entry.key(), "/api/Notification/Pull");
        assert_eq!(entry.reason().to_string(), "unsupported_method");
    }
}
