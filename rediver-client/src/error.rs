//! The single error type surfaced by every API call.

use reqwest::StatusCode;
use rediver_core::ApiErrorBody;
use std::fmt;

/// Where a failure originated. UI code usually only needs the message, but
/// session handling distinguishes API rejections from transport trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    Transport,
    /// Non-2xx response with a structured `{code, message}` body.
    Api,
    /// Non-2xx response whose body was absent or not the structured shape.
    UnparseableBody,
    /// 2xx response whose body did not match the expected type.
    Decode,
    /// Rejected locally before any network call.
    InvalidRequest,
}

/// `(message, code, status)` for any failed call.
#[derive(Debug, Clone)]
pub struct ApiClientError {
    kind: ErrorKind,
    message: String,
    code: String,
    status: Option<StatusCode>,
    details: Option<serde_json::Value>,
}

impl ApiClientError {
    pub const UNKNOWN_ERROR: &'static str = "UNKNOWN_ERROR";
    pub const NETWORK_ERROR: &'static str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &'static str = "DECODE_ERROR";
    pub const INVALID_REQUEST: &'static str = "INVALID_REQUEST";

    /// Build the error for a non-2xx response.
    ///
    /// Falls back to `UNKNOWN_ERROR` plus the status text when the body is
    /// missing or is not a `{code, message}` object.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => Self {
                kind: ErrorKind::Api,
                message: parsed.message,
                code: parsed.code,
                status: Some(status),
                details: parsed.details,
            },
            Err(_) => Self {
                kind: ErrorKind::UnparseableBody,
                message: status_text(status),
                code: Self::UNKNOWN_ERROR.to_string(),
                status: Some(status),
                details: None,
            },
        }
    }

    pub fn transport(message: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.to_string(),
            code: Self::NETWORK_ERROR.to_string(),
            status: None,
            details: None,
        }
    }

    pub fn decode(status: StatusCode, err: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: format!("Unexpected response body: {err}"),
            code: Self::DECODE_ERROR.to_string(),
            status: Some(status),
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidRequest,
            message: message.into(),
            code: Self::INVALID_REQUEST.to_string(),
            status: None,
            details: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// HTTP status of the response, absent for transport and local failures.
    pub fn status(&self) -> Option<u16> {
        self.status.map(|s| s.as_u16())
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}, HTTP {})", self.message, self.code, status.as_u16()),
            None => write!(f, "{} ({})", self.message, self.code),
        }
    }
}

impl std::error::Error for ApiClientError {}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::transport("Request timed out");
        }
        if err.is_connect() {
            return Self::transport("Could not connect to the API server");
        }
        Self::transport(err)
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_body_is_used() {
        let err = ApiClientError::from_response(
            StatusCode::CONFLICT,
            br#"{"code":"AGENT_BUSY","message":"Agent has running jobs","details":{"jobs":2}}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.code(), "AGENT_BUSY");
        assert_eq!(err.message(), "Agent has running jobs");
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.details().unwrap()["jobs"], 2);
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status_text() {
        let err = ApiClientError::from_response(StatusCode::BAD_GATEWAY, b"<html>upstream</html>");
        assert_eq!(err.kind(), ErrorKind::UnparseableBody);
        assert_eq!(err.code(), ApiClientError::UNKNOWN_ERROR);
        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.status(), Some(502));

        let err = ApiClientError::from_response(StatusCode::UNAUTHORIZED, b"");
        assert_eq!(err.message(), "Unauthorized");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_nonstandard_status_without_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = ApiClientError::from_response(status, b"");
        assert_eq!(err.message(), "HTTP 599");
    }

    #[test]
    fn test_transport_has_no_status() {
        let err = ApiClientError::transport("connection reset");
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), ApiClientError::NETWORK_ERROR);
        assert_eq!(err.to_string(), "connection reset (NETWORK_ERROR)");
    }
}
