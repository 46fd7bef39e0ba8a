//! Request dispatch: one call from wire request to settlement.

use bytes::Bytes;
use http_body_util::Full;
use tracing::{debug, warn};

use crate::body::RequestBody;
use crate::config::ClientConfig;
use crate::decode::{self, DecodedBody};
use crate::error::{ClientError, Rejection};
use crate::http::{build_request, HttpMethod};
use crate::transport::{self, Transport};

/// Send one request and settle it.
///
/// Errors found before anything is written (unsupported protocol, invalid
/// header or path, unserializable body) reject without reaching the error
/// sink. Every later failure is reported to the sink exactly once before the
/// call settles.
pub async fn dispatch(
    config: &ClientConfig,
    method: HttpMethod,
    path: &str,
    body: Option<&RequestBody>,
) -> Result<DecodedBody, Rejection> {
    let (transport, request) = match prepare(config, method, path, body) {
        Ok(prepared) => prepared,
        Err(err) => {
            warn!(error = %err, %method, path, "request rejected before sending");
            return Err(Rejection::Error(err));
        }
    };

    debug!(%method, path, host = %config.base_url, protocol = %transport.protocol(), "sending request");

    let exchanged = async {
        let response = transport.send(&config.base_url, config.port, request).await?;
        decode::accumulate(response).await
    }
    .await;

    match exchanged {
        Ok(response) => {
            debug!(%method, path, status = response.status, "response received");
            decode::settle(config, response)
        }
        Err(err) => {
            config.error_sink.report(&err);
            Err(Rejection::Error(err))
        }
    }
}

fn prepare(
    config: &ClientConfig,
    method: HttpMethod,
    path: &str,
    body: Option<&RequestBody>,
) -> Result<(Transport, http::Request<Full<Bytes>>), ClientError> {
    let transport = transport::select(&config.protocol)?;
    let request = build_request(config, method, path, body)?.into_hyper()?;
    Ok((transport, request))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientOptions;

    fn counting_config(options: ClientOptions) -> (ClientConfig, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = ClientConfig::resolve(
            "127.0.0.1",
            options.error_sink(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (config, calls)
    }

    #[tokio::test]
    async fn unsupported_protocol_skips_the_sink() {
        let (config, calls) = counting_config(ClientOptions::default().protocol("gopher"));
        let rejection = dispatch(&config, HttpMethod::Get, "/", None)
            .await
            .unwrap_err();
        assert!(matches!(
            rejection,
            Rejection::Error(ClientError::UnsupportedProtocol(ref p)) if p == "gopher"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_path_skips_the_sink() {
        let (config, calls) = counting_config(ClientOptions::default());
        let rejection = dispatch(&config, HttpMethod::Get, "/has space", None)
            .await
            .unwrap_err();
        assert!(matches!(
            rejection,
            Rejection::Error(ClientError::InvalidRequest(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refused_connection_reports_once() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let (config, calls) = counting_config(ClientOptions::default().port(port));
        let rejection = dispatch(&config, HttpMethod::Get, "/", None)
            .await
            .unwrap_err();
        assert!(matches!(rejection, Rejection::Error(ClientError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
