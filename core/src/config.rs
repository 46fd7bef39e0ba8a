//! Client configuration: caller overrides resolved over fixed defaults.
//!
//! # Design
//! `ClientOptions` is the partial form a caller supplies (or deserializes
//! from JSON/TOML); `ClientConfig` is the resolved form a `Client` keeps for
//! its whole lifetime. The resolved config is never mutated after
//! construction. Per-request headers such as `content-length` are added to a
//! copy of `headers` when a request is built.
//!
//! The protocol stays a string here so that an unsupported value is reported
//! by the transport selector at dispatch time, not at construction.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::error;

use crate::error::ClientError;

pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_ENCODING: &str = "utf8";

/// Side-effecting hook invoked once for every failing call, before the call
/// settles. It observes failures and never changes the outcome.
#[derive(Clone)]
pub struct ErrorSink(Arc<dyn Fn(&ClientError) + Send + Sync>);

impl ErrorSink {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&ClientError) + Send + Sync + 'static,
    {
        Self(Arc::new(sink))
    }

    pub fn report(&self, err: &ClientError) {
        (self.0)(err)
    }
}

/// Logs the failure as a `tracing` `error` event.
///
/// Nothing is printed unless the application installs a subscriber; callers
/// that want output without one should supply their own sink.
impl Default for ErrorSink {
    fn default() -> Self {
        Self::new(|err| error!(error = %err, "http request failed"))
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorSink(..)")
    }
}

/// Caller-supplied overrides. Every field left `None` takes its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientOptions {
    /// Accepted for shape compatibility; always replaced by the url passed to
    /// `Client::new`.
    pub base_url: Option<String>,
    pub protocol: Option<String>,
    pub encoding: Option<String>,
    pub port: Option<u16>,
    #[serde(skip)]
    pub error_sink: Option<ErrorSink>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl ClientOptions {
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn error_sink<F>(mut self, sink: F) -> Self
    where
        F: Fn(&ClientError) + Send + Sync + 'static,
    {
        self.error_sink = Some(ErrorSink::new(sink));
        self
    }
}

/// Resolved, immutable configuration of one client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name requests are sent to.
    pub base_url: String,
    /// Scheme tag; `http` or `https` are the only values that dispatch.
    pub protocol: String,
    /// Character encoding of received bodies. Carried, not interpreted:
    /// bodies are always decoded as UTF-8.
    pub encoding: String,
    pub port: Option<u16>,
    pub error_sink: ErrorSink,
    /// Default headers for every request, names lower-cased.
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Merge `overrides` over the defaults. `base_url` is always `url`.
    pub fn resolve(url: &str, overrides: ClientOptions) -> Self {
        let headers = overrides
            .headers
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        Self {
            base_url: url.to_string(),
            protocol: overrides
                .protocol
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
            encoding: overrides
                .encoding
                .unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
            port: overrides.port,
            error_sink: overrides.error_sink.unwrap_or_default(),
            headers,
        }
    }
}
