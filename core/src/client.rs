//! Verb entry points over the request dispatcher.
//!
//! # Design
//! `Client` holds only its resolved configuration behind an `Arc`, so clones
//! are cheap and every clone shares the same immutable settings. Each verb
//! fixes the method and forwards to `dispatch`; calls are independent
//! futures that may run concurrently and settle in any order.

use std::sync::Arc;

use crate::body::RequestBody;
use crate::config::{ClientConfig, ClientOptions};
use crate::decode::DecodedBody;
use crate::dispatch::dispatch;
use crate::error::Rejection;
use crate::http::HttpMethod;

/// Async HTTP/HTTPS client bound to one host.
///
/// Every call resolves with the decoded body, or rejects with a
/// [`Rejection`]. An error status (`400..600`) rejects with
/// `Rejection::Status` carrying the decoded body itself; all other failures
/// reject with `Rejection::Error`.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    /// Client for host `url`. `options.base_url` is ignored in favour of `url`.
    pub fn new(url: &str, options: ClientOptions) -> Self {
        Self {
            config: Arc::new(ClientConfig::resolve(url, options)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn get(&self, path: &str) -> Result<DecodedBody, Rejection> {
        self.request(HttpMethod::Get, path, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<DecodedBody, Rejection> {
        self.request(HttpMethod::Post, path, body).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<DecodedBody, Rejection> {
        self.request(HttpMethod::Put, path, body).await
    }

    pub async fn delete(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<DecodedBody, Rejection> {
        self.request(HttpMethod::Delete, path, body).await
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<DecodedBody, Rejection> {
        dispatch(&self.config, method, path, body.as_ref()).await
    }
}
