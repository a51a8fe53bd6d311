//! One request in, one typed result out.
//!
//! [`Client`] runs a request through a [`RequestExecutor`] and hands the raw
//! response to a [`Pipeline`]. It keeps no state between calls, so a single
//! client can serve any number of concurrent requests.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{Instrument, Level, info, span, warn};
use url::Url;

use crate::{
    DecodeFailure, Error, ErrorDecoder, HyperExecutor, NoErrorDecoder, Outcome, Pipeline,
    PipelineConfig, RawResponse, RequestExecutor, TransportError,
};

/// Typed HTTP client over an executor and a pipeline.
///
/// # Example
///
/// ```ignore
/// use verdict::prelude::*;
///
/// #[derive(Debug, Deserialize)]
/// struct User { id: u64, user_name: String }
///
/// #[derive(Debug, Deserialize)]
/// struct ApiError { code: i64, message: String }
///
/// let pipeline = Pipeline::default().with_error_shape::<ApiError>();
/// let client = Client::with_pipeline(HyperExecutor::new(), pipeline);
///
/// match client.get::<User>(&"https://api.example.com/users/1".parse()?).await {
///     Ok(user) => println!("{}", user.user_name),
///     Err(Error::Application { error, .. }) => println!("{}", error.message),
///     Err(err) => println!("{err}"),
/// }
/// ```
#[derive(Debug)]
pub struct Client<X, D = NoErrorDecoder> {
    executor: X,
    pipeline: Arc<Pipeline<D>>,
}

impl<X: Clone, D> Clone for Client<X, D> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl Client<HyperExecutor> {
    /// Client over a default [`HyperExecutor`] and a default pipeline.
    #[must_use]
    pub fn hyper() -> Self {
        Self::new(HyperExecutor::new())
    }
}

impl<X: RequestExecutor> Client<X> {
    /// Client with a default pipeline and no error decoder.
    #[must_use]
    pub fn new(executor: X) -> Self {
        Self::with_pipeline(executor, Pipeline::new(PipelineConfig::default()))
    }
}

impl<X, D> Client<X, D>
where
    X: RequestExecutor,
    D: ErrorDecoder,
{
    /// Client with an explicit pipeline.
    #[must_use]
    pub fn with_pipeline(executor: X, pipeline: Pipeline<D>) -> Self {
        Self {
            executor,
            pipeline: Arc::new(pipeline),
        }
    }

    /// The underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &X {
        &self.executor
    }

    /// The response pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<D> {
        &self.pipeline
    }

    /// Send a request and decode the success body as JSON.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<T, Error<D::Error>> {
        self.send_with_meta(request).await.into_result()
    }

    /// Like [`Self::send`], keeping status and headers.
    pub async fn send_with_meta<T: DeserializeOwned>(
        &self,
        request: http::Request<Bytes>,
    ) -> Outcome<T, D::Error> {
        let response = self.exchange(request).await;
        self.pipeline.complete(response)
    }

    /// Send a request and return the success body untouched.
    pub async fn send_bytes(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<Bytes, Error<D::Error>> {
        self.send_with(request, |body| Ok(body.clone())).await
    }

    /// Send a request and decode the success body with `builder`.
    pub async fn send_with<T, F>(
        &self,
        request: http::Request<Bytes>,
        builder: F,
    ) -> Result<T, Error<D::Error>>
    where
        F: FnOnce(&Bytes) -> Result<T, DecodeFailure>,
    {
        let response = self.exchange(request).await?;
        self.pipeline.process_with(response, builder)
    }

    /// `GET` the URL and decode the success body as JSON.
    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, Error<D::Error>> {
        self.send(get_request(url)?).await
    }

    /// Like [`Self::get`], keeping status and headers.
    pub async fn get_with_meta<T: DeserializeOwned>(&self, url: &Url) -> Outcome<T, D::Error> {
        match get_request(url) {
            Ok(request) => self.send_with_meta(request).await,
            Err(err) => Outcome {
                result: Err(Error::Transport(err)),
                meta: None,
            },
        }
    }

    async fn exchange(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<RawResponse, TransportError> {
        let method = request.method().clone();
        let url = request.uri().to_string();

        let span = span!(Level::INFO, "http_request", %method, %url);

        async move {
            let start = Instant::now();
            info!(method = %method, url = %url, "sending request");

            let result = self.executor.execute(request).await;

            // Saturating conversion to u64 (truncates after ~584 million years)
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => info!(status = response.status(), elapsed_ms, "request completed"),
                Err(err) => warn!(error = %err, elapsed_ms, "request failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

fn get_request(url: &Url) -> Result<http::Request<Bytes>, TransportError> {
    http::Request::get(url.as_str())
        .body(Bytes::new())
        .map_err(|e| TransportError::invalid_request(e.to_string()))
}
