//! Minimal async HTTP/HTTPS client with verb helpers and content-type
//! driven decoding.
//!
//! # Overview
//! `Client` exposes `get`, `post`, `put` and `delete`. Each call selects the
//! transport for the configured protocol, serializes the body, sends one
//! HTTP/1.1 request, buffers the whole response and decodes it by its
//! declared content type. Failures are reported to a single configurable
//! error sink before the call settles.
//!
//! # Design
//! - Configuration is resolved once per client and never mutated; computed
//!   headers go into a per-request copy.
//! - Requests are described as plain `HttpRequest` data before any I/O, so
//!   request building is tested without a network.
//! - Transports are a closed enum over `http` and `https`.
//! - An error status rejects with the decoded body (`Rejection::Status`),
//!   while the sink receives it wrapped as `ClientError::Status`. Errors
//!   raised before sending (for example an unsupported protocol) do not
//!   reach the sink.

pub mod body;
pub mod client;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod status;
pub mod transport;

pub use body::RequestBody;
pub use client::Client;
pub use config::{ClientConfig, ClientOptions, ErrorSink};
pub use decode::{ContentType, DecodedBody};
pub use error::{ClientError, Rejection};
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse};
pub use status::is_error_status;
pub use transport::{Protocol, Transport};
