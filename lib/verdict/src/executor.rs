//! Request executor using hyper-util.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};

use crate::{
    ExecutorConfig, RawResponse, RequestExecutor, TransportError, connector::https_connector,
};

/// [`RequestExecutor`] backed by hyper-util with rustls.
///
/// Buffers the whole body before returning. The configured timeout covers
/// the complete call, body included.
///
/// # Example
///
/// ```ignore
/// use verdict::{ExecutorConfig, HyperExecutor};
/// use std::time::Duration;
///
/// let executor = HyperExecutor::with_config(
///     ExecutorConfig::builder().timeout(Duration::from_secs(5)).build(),
/// );
/// ```
#[derive(Clone)]
pub struct HyperExecutor {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ExecutorConfig,
}

impl std::fmt::Debug for HyperExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperExecutor {
    /// Create a new executor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create a new executor with custom configuration.
    #[must_use]
    pub fn with_config(config: ExecutorConfig) -> Self {
        let connector = https_connector(config.connect_timeout);
        let inner = Client::builder(TokioExecutor::new()).build(connector);

        Self { inner, config }
    }

    /// Get the executor configuration.
    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn round_trip(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .inner
            .request(request.map(Full::new))
            .await
            .map_err(Self::map_hyper_error)?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TransportError::connection(e.to_string()))?
            .to_bytes();

        Ok(RawResponse::from(http::Response::from_parts(parts, body)))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let msg = err.to_string();

        if err.is_connect() {
            return TransportError::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return TransportError::tls(msg);
        }

        TransportError::connection(msg)
    }
}

impl Default for HyperExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor for HyperExecutor {
    async fn execute(&self, request: http::Request<Bytes>) -> Result<RawResponse, TransportError> {
        tokio::time::timeout(self.config.timeout, self.round_trip(request))
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}
