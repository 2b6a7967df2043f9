//! Error types for the Tika client.
//!
//! # Design
//! Errors fall into three classes that callers branch on: the service could
//! not be reached (`ErrorKind::Transport`), it answered with a non-2xx status
//! (`ErrorKind::Status`), or it answered with a body that breaks the expected
//! shape (`ErrorKind::Decode`). `Error::kind` collapses the variants into
//! those classes; the variants themselves keep the detail for diagnostics.

use std::io;

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No usable response: bad method or URL, connection failure, unreadable input.
    Transport,
    /// The service answered with a status outside 200-299.
    Status,
    /// The service answered 2xx but the body does not match the expected shape.
    Decode,
}

/// Errors returned by `TikaClient` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A caller-supplied path segment that cannot be sent as one segment.
    #[error("invalid path segment {0:?}")]
    InvalidPathSegment(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The document stream could not be read into the request body.
    #[error("reading document: {0}")]
    Input(#[from] io::Error),

    /// Non-2xx response. `body` is kept for debugging and never interpreted.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidMethod(_)
            | Error::InvalidUrl { .. }
            | Error::InvalidPathSegment(_)
            | Error::Transport(_)
            | Error::Input(_)
            | Error::Config(_) => ErrorKind::Transport,
            Error::Status { .. } => ErrorKind::Status,
            Error::Decode(_) => ErrorKind::Decode,
        }
    }

    /// The HTTP status code, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A failure inside a [`Transport`](crate::http::Transport) where no response
/// was received.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The response body does not have the shape a decoder requires.
///
/// `path` uses a JSONPath-like notation rooted at `$`, e.g.
/// `$[0].other_key[1]` or `$.children[2].composite`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("{path}: expected {expected}, found {found}")]
    UnexpectedType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: missing required field")]
    MissingField { path: String },
}

impl DecodeError {
    /// Location of the offending value, if the error is structural.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::Syntax(_) => None,
            DecodeError::UnexpectedType { path, .. } | DecodeError::MissingField { path } => {
                Some(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::InvalidMethod("bad method".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::Transport(TransportError::new("refused")).kind(), ErrorKind::Transport);
        assert_eq!(
            Error::Input(io::Error::new(io::ErrorKind::UnexpectedEof, "eof")).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            Error::Status { status: 500, body: String::new() }.kind(),
            ErrorKind::Status
        );
        let decode = DecodeError::MissingField { path: "$.name".into() };
        assert_eq!(Error::from(decode).kind(), ErrorKind::Decode);
    }

    #[test]
    fn status_exposes_code() {
        let err = Error::Status { status: 503, body: "busy".into() };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP 503: busy");
        assert_eq!(Error::InvalidMethod("x".into()).status(), None);
    }

    #[test]
    fn decode_error_display_includes_path() {
        let err = DecodeError::UnexpectedType {
            path: "$[0].other_key".into(),
            expected: "string or array of strings",
            found: "object",
        };
        assert_eq!(err.path(), Some("$[0].other_key"));
        assert_eq!(
            err.to_string(),
            "$[0].other_key: expected string or array of strings, found object"
        );
    }

    #[test]
    fn syntax_error_has_no_path() {
        let err: DecodeError = serde_json::from_str::<serde_json::Value>("invalid")
            .unwrap_err()
            .into();
        assert!(err.path().is_none());
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("connect", io);
        assert_eq!(err.message(), "connect");
        assert!(std::error::Error::source(&err).is_some());
    }
}
