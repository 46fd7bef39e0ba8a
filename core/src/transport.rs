//! Transport capabilities, one per supported scheme.
//!
//! `select` is a pure lookup. `Transport::send` opens a fresh connection,
//! runs one HTTP/1.1 exchange over it and hands back the response head with
//! its still-streaming body.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::error::ClientError;

/// Supported URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(ClientError::UnsupportedProtocol(other.to_string())),
        }
    }
}

/// Capability to open a request against a remote host.
#[derive(Clone)]
pub enum Transport {
    Http,
    Https(Arc<rustls::ClientConfig>),
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Http => "Transport::Http",
            Transport::Https(_) => "Transport::Https",
        })
    }
}

/// Map a protocol tag to its transport. No network activity.
pub fn select(protocol: &str) -> Result<Transport, ClientError> {
    match protocol.parse::<Protocol>()? {
        Protocol::Http => Ok(Transport::Http),
        Protocol::Https => Ok(Transport::Https(tls_config()?)),
    }
}

static TLS_CONFIG: OnceLock<Arc<rustls::ClientConfig>> = OnceLock::new();

/// Process-wide TLS client config using the Mozilla root store.
fn tls_config() -> Result<Arc<rustls::ClientConfig>, ClientError> {
    if let Some(config) = TLS_CONFIG.get() {
        return Ok(Arc::clone(config));
    }

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(
        rustls::crypto::ring::default_provider().into(),
    )
    .with_safe_default_protocol_versions()
    .map_err(ClientError::transport)?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    Ok(Arc::clone(TLS_CONFIG.get_or_init(|| Arc::new(config))))
}

impl Transport {
    pub fn protocol(&self) -> Protocol {
        match self {
            Transport::Http => Protocol::Http,
            Transport::Https(_) => Protocol::Https,
        }
    }

    /// Connect to `host:port` and send `request`.
    ///
    /// Resolves once the response head arrives; the body is read by the
    /// caller. Every failure is a `ClientError::Transport`.
    pub async fn send(
        &self,
        host: &str,
        port: Option<u16>,
        request: http::Request<Full<Bytes>>,
    ) -> Result<http::Response<Incoming>, ClientError> {
        let port = port.unwrap_or_else(|| self.protocol().default_port());
        let stream = TcpStream::connect((host, port)).await.map_err(|e| {
            debug!(error = %e, host, port, "connection failed");
            ClientError::transport(e)
        })?;

        match self {
            Transport::Http => exchange(stream, request).await,
            Transport::Https(tls) => {
                let server_name =
                    ServerName::try_from(host.to_string()).map_err(ClientError::transport)?;
                let stream = TlsConnector::from(Arc::clone(tls))
                    .connect(server_name, stream)
                    .await
                    .map_err(|e| {
                        debug!(error = %e, host, port, "tls handshake failed");
                        ClientError::transport(e)
                    })?;
                exchange(stream, request).await
            }
        }
    }
}

/// Run one HTTP/1.1 exchange over an established stream.
async fn exchange<S>(
    stream: S,
    request: http::Request<Full<Bytes>>,
) -> Result<http::Response<Incoming>, ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .map_err(ClientError::transport)?;

    // Drive the connection in the background until the exchange is done.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "connection closed with error");
        }
    });

    sender
        .send_request(request)
        .await
        .map_err(ClientError::transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_and_https_are_selectable() {
        assert!(matches!(select("http").unwrap(), Transport::Http));
        assert!(matches!(select("https").unwrap(), Transport::Https(_)));
    }

    #[test]
    fn tls_config_is_shared() {
        let (Transport::Https(a), Transport::Https(b)) =
            (select("https").unwrap(), select("https").unwrap())
        else {
            panic!("expected https transports");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unknown_protocol_is_rejected() {
        let err = select("unknown").unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedProtocol(ref p) if p == "unknown"));
        assert_eq!(err.to_string(), "Unsupported protocol: unknown");
    }

    #[test]
    fn protocol_matching_is_exact() {
        assert!(select("HTTP").is_err());
        assert!(select("http:").is_err());
        assert!(select("").is_err());
    }

    #[test]
    fn default_ports() {
        assert_eq!(Protocol::Http.default_port(), 80);
        assert_eq!(Protocol::Https.default_port(), 443);
        assert_eq!(select("https").unwrap().protocol(), Protocol::Https);
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let request = http::Request::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let err = Transport::Http
            .send("127.0.0.1", Some(port), request)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
