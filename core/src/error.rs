//! Error types for the verb client.
//!
//! # Design
//! `ClientError` is the value handed to the error sink and, for every failure
//! other than an error status, the value the caller receives. Error statuses
//! are the exception: the sink sees `ClientError::Status` while the caller
//! receives `Rejection::Status` holding the decoded body itself. Keeping the
//! two types apart makes that split visible in signatures instead of leaving
//! callers to inspect the payload.

use thiserror::Error;

use crate::decode::DecodedBody;

/// Boxed error produced by the connection layer (socket, TLS or hyper).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures reported to the error sink and carried by `Rejection::Error`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured protocol is not `http` or `https`. Raised before any
    /// network activity.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// A header or path cannot be represented on the wire. Raised before any
    /// network activity.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The outgoing structured body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response declared a content type outside the supported table, or
    /// declared none at all.
    #[error(
        "Unsupported content-type for http response received: {}",
        .0.as_deref().unwrap_or("undefined")
    )]
    UnsupportedContentType(Option<String>),

    /// The response body did not parse under its declared content type.
    #[error("failed to parse response body: {0}")]
    Parse(#[source] serde_json::Error),

    /// The connection failed: refused, reset, TLS failure, or the stream
    /// ended before the response was complete.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// Wrapped form of an error-status response, given to the error sink only.
    /// The caller receives the bare body through `Rejection::Status`.
    #[error("{body}")]
    Status { status: u16, body: DecodedBody },
}

impl ClientError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        ClientError::Transport(err.into())
    }

    /// Whether this error was raised before anything was written to the
    /// network. These errors are not reported to the error sink.
    pub fn is_pre_send(&self) -> bool {
        matches!(
            self,
            ClientError::UnsupportedProtocol(_)
                | ClientError::InvalidRequest(_)
                | ClientError::Serialization(_)
        )
    }
}

/// The failure value a call settles with.
///
/// An error-status response rejects with the decoded body, not with an error
/// object: callers that need to tell a 404 payload apart from a broken
/// connection match on the variant. The error sink is not told about the
/// same thing in the same way; it receives `ClientError::Status`.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The server answered with a status in `400..600`.
    #[error("request rejected with status {status}: {body}")]
    Status { status: u16, body: DecodedBody },

    /// Configuration, transport, content-type or parse failure.
    #[error(transparent)]
    Error(#[from] ClientError),
}

impl Rejection {
    /// The decoded body of an error-status rejection.
    pub fn body(&self) -> Option<&DecodedBody> {
        match self {
            Rejection::Status { body, .. } => Some(body),
            Rejection::Error(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Rejection::Status { status, .. } => Some(*status),
            Rejection::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Rejection::Status { .. } => None,
            Rejection::Error(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_protocol_names_the_value() {
        let err = ClientError::UnsupportedProtocol("ftp".to_string());
        assert_eq!(err.to_string(), "Unsupported protocol: ftp");
        assert!(err.is_pre_send());
    }

    #[test]
    fn unsupported_content_type_names_the_value() {
        let err = ClientError::UnsupportedContentType(Some("unknown".to_string()));
        assert_eq!(
            err.to_string(),
            "Unsupported content-type for http response received: unknown"
        );
    }

    #[test]
    fn missing_content_type_reads_as_undefined() {
        let err = ClientError::UnsupportedContentType(None);
        assert_eq!(
            err.to_string(),
            "Unsupported content-type for http response received: undefined"
        );
    }

    #[test]
    fn status_error_displays_the_body() {
        let err = ClientError::Status {
            status: 404,
            body: DecodedBody::Json(serde_json::json!({"hello": "world"})),
        };
        assert_eq!(err.to_string(), r#"{"hello":"world"}"#);
        assert!(!err.is_pre_send());
    }

    #[test]
    fn transport_error_keeps_its_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::transport(io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_pre_send());
    }

    #[test]
    fn rejection_accessors() {
        let status = Rejection::Status {
            status: 500,
            body: DecodedBody::Text("oops".to_string()),
        };
        assert_eq!(status.status(), Some(500));
        assert_eq!(status.body(), Some(&DecodedBody::Text("oops".to_string())));
        assert!(status.error().is_none());

        let error = Rejection::from(ClientError::UnsupportedContentType(None));
        assert!(error.status().is_none());
        assert!(error.body().is_none());
        assert!(matches!(
            error.error(),
            Some(ClientError::UnsupportedContentType(None))
        ));
    }
}
