//! Classification, decoding and result assembly for one response.
//!
//! A [`Pipeline`] is immutable once built, so a single instance can be shared
//! across threads and calls.
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use verdict_core::{Error, Pipeline, PipelineConfig, RawResponse};
//!
//! #[derive(Debug, Deserialize)]
//! struct User { id: u64, user_name: String }
//!
//! #[derive(Debug, Deserialize)]
//! struct ApiError { code: i64, message: String }
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).with_error_shape::<ApiError>();
//!
//! let user: User = pipeline
//!     .process(RawResponse::from_status(200, r#"{"id":1,"user_name":"ann"}"#))
//!     .expect("success");
//! assert_eq!(user.user_name, "ann");
//!
//! let err = pipeline
//!     .process::<User>(RawResponse::from_status(422, r#"{"code":7,"message":"bad"}"#))
//!     .expect_err("application error");
//! assert_eq!(err.application().map(|e| e.code), Some(7));
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::{
    Branch, DecodeError, DecodeFailure, Error, ErrorDecoder, JsonErrorDecoder, LogLevel,
    NoErrorDecoder, PipelineConfig, RawResponse, ResponseMeta, TransportError, decode_json,
};

// ============================================================================
// Body Observer
// ============================================================================

/// Receives every raw body before classification when body logging is on.
///
/// Observers see the body as lossy UTF-8 text and cannot influence the result.
pub trait BodyObserver: Send + Sync {
    /// Called once per response.
    fn observe(&self, status: u16, body: &str);
}

impl<F> BodyObserver for F
where
    F: Fn(u16, &str) + Send + Sync,
{
    fn observe(&self, status: u16, body: &str) {
        self(status, body);
    }
}

/// Default observer: logs through `tracing` at the configured level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    level: LogLevel,
}

impl TracingObserver {
    /// Observer logging at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl BodyObserver for TracingObserver {
    fn observe(&self, status: u16, body: &str) {
        match self.level {
            LogLevel::Debug => debug!(status, body, "data response"),
            LogLevel::Info => info!(status, body, "data response"),
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Typed result together with the metadata of the response it came from.
///
/// `meta` is `None` only when the transport failed.
#[derive(Debug)]
pub struct Outcome<T, E> {
    /// Typed result.
    pub result: Result<T, Error<E>>,
    /// Status and headers of the response.
    pub meta: Option<ResponseMeta>,
}

impl<T, E> Outcome<T, E> {
    /// Consume into the typed result, dropping the metadata.
    pub fn into_result(self) -> Result<T, Error<E>> {
        self.result
    }

    /// Consume into (result, metadata).
    #[must_use]
    pub fn into_parts(self) -> (Result<T, Error<E>>, Option<ResponseMeta>) {
        (self.result, self.meta)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Turns a [`RawResponse`] into a typed result.
///
/// `D` is the application error decoder; without one, non-success responses
/// surface as [`Error::Status`].
pub struct Pipeline<D = NoErrorDecoder> {
    config: PipelineConfig,
    error_decoder: Option<D>,
    observer: Arc<dyn BodyObserver>,
}

impl Pipeline {
    /// Pipeline without an error decoder.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_decoder: None,
            observer: Arc::new(TracingObserver::new(config.log_level)),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<D: Clone> Clone for Pipeline<D> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            error_decoder: self.error_decoder.clone(),
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Pipeline<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("error_decoder", &self.error_decoder)
            .finish_non_exhaustive()
    }
}

impl<D: ErrorDecoder> Pipeline<D> {
    /// Replace the error decoder.
    #[must_use]
    pub fn with_error_decoder<D2: ErrorDecoder>(self, decoder: D2) -> Pipeline<D2> {
        Pipeline {
            config: self.config,
            error_decoder: Some(decoder),
            observer: self.observer,
        }
    }

    /// Decode error bodies as JSON into `E`, using the configured key strategy.
    #[must_use]
    pub fn with_error_shape<E>(self) -> Pipeline<JsonErrorDecoder<E>>
    where
        E: DeserializeOwned + fmt::Debug + Send + Sync + 'static,
    {
        let decoder = JsonErrorDecoder::new(self.config.key_decoding);
        self.with_error_decoder(decoder)
    }

    /// Replace the body observer used when `log_body` is on.
    #[must_use]
    pub fn with_body_observer(mut self, observer: impl BodyObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Pipeline configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns `true` if an error decoder is configured.
    #[must_use]
    pub const fn has_error_decoder(&self) -> bool {
        self.error_decoder.is_some()
    }

    /// Classify a status code under this pipeline's configuration.
    #[must_use]
    pub const fn classify(&self, status: u16) -> Branch {
        self.config
            .classifier()
            .classify(status, self.has_error_decoder())
    }

    /// Decode the success payload as JSON into `T`.
    pub fn process<T: DeserializeOwned>(
        &self,
        response: RawResponse,
    ) -> Result<T, Error<D::Error>> {
        self.process_with(response, |body| decode_json(body, &self.config.key_decoding))
    }

    /// Return the success body untouched.
    pub fn process_bytes(&self, response: RawResponse) -> Result<Bytes, Error<D::Error>> {
        self.process_with(response, |body| Ok(body.clone()))
    }

    /// Decode the success payload with a caller-supplied builder.
    pub fn process_with<T, F>(
        &self,
        response: RawResponse,
        builder: F,
    ) -> Result<T, Error<D::Error>>
    where
        F: FnOnce(&Bytes) -> Result<T, DecodeFailure>,
    {
        let (status, _, body) = response.into_parts();
        self.assemble(status, body, builder)
    }

    /// Like [`Self::process`], keeping the response metadata.
    pub fn process_with_meta<T: DeserializeOwned>(
        &self,
        response: RawResponse,
    ) -> Outcome<T, D::Error> {
        let (meta, body) = response.into_meta();
        let result = self.assemble(meta.status(), body, |body| {
            decode_json(body, &self.config.key_decoding)
        });
        Outcome {
            result,
            meta: Some(meta),
        }
    }

    /// Finish a call whose transport may have failed.
    ///
    /// A transport failure short-circuits classification entirely.
    pub fn complete<T: DeserializeOwned>(
        &self,
        response: Result<RawResponse, TransportError>,
    ) -> Outcome<T, D::Error> {
        match response {
            Ok(response) => self.process_with_meta(response),
            Err(err) => Outcome {
                result: Err(Error::Transport(err)),
                meta: None,
            },
        }
    }

    /// Run one response through classification and decoding.
    ///
    /// Every path ends in exactly one result; nothing is retried.
    pub fn assemble<T, F>(
        &self,
        status: u16,
        body: Bytes,
        builder: F,
    ) -> Result<T, Error<D::Error>>
    where
        F: FnOnce(&Bytes) -> Result<T, DecodeFailure>,
    {
        if self.config.log_body {
            self.observer.observe(status, &String::from_utf8_lossy(&body));
        }

        let branch = self.classify(status);
        debug!(status, ?branch, "classified response");

        match branch {
            Branch::Success => builder(&body)
                .map_err(|cause| Error::Decode(DecodeError::invalid_data(cause, body))),
            Branch::ApplicationError => Err(self.decode_error(status, body)),
            Branch::Unclassified => Err(Error::Status { status, body }),
        }
    }

    fn decode_error(&self, status: u16, body: Bytes) -> Error<D::Error> {
        let Some(decoder) = &self.error_decoder else {
            warn!(status, "application error status without an error decoder");
            return Error::MissingErrorDecoder { status };
        };

        match decoder.decode(status, &body) {
            Ok(error) => Error::Application { status, error },
            Err(cause) => Error::Decode(DecodeError::error_payload(status, cause, body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert2::{check, let_assert};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{DecodePhase, KeyDecoding};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        id: u64,
        user_name: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct ApiError {
        code: i64,
        message: String,
    }

    fn response(status: u16, body: &'static str) -> RawResponse {
        RawResponse::from_status(status, body)
    }

    #[test]
    fn success_range_decodes_payload() {
        let pipeline = Pipeline::default();
        for status in 200..=206 {
            let user: User = pipeline
                .process(response(status, r#"{"id":1,"user_name":"ann"}"#))
                .expect("success");
            check!(user.id == 1);
        }
    }

    #[test]
    fn snake_case_wire_into_camel_case_shape() {
        #[derive(Debug, PartialEq, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Profile {
            id: u64,
            user_name: String,
        }

        let config = PipelineConfig::builder()
            .key_decoding(KeyDecoding::ConvertFromSnakeCase)
            .build()
            .expect("config");
        let pipeline = Pipeline::new(config);

        let profile: Profile = pipeline
            .process(response(200, r#"{"id":1,"user_name":"ann"}"#))
            .expect("success");
        check!(
            profile
                == Profile {
                    id: 1,
                    user_name: "ann".to_string()
                }
        );
    }

    #[test]
    fn not_found_without_error_shape_is_status_error() {
        let pipeline = Pipeline::default();

        let_assert!(
            Err(Error::Status { status, .. }) =
                pipeline.process::<User>(response(404, r#"{"code":7,"message":"bad"}"#))
        );
        check!(status == 404);
    }

    #[test]
    fn status_error_ignores_body_content() {
        let pipeline = Pipeline::default();
        for body in ["", "not json", r#"{"id":1,"user_name":"ann"}"#] {
            let result = pipeline.process::<User>(response(500, body));
            let_assert!(Err(Error::Status { status: 500, .. }) = result);
        }
    }

    #[test]
    fn unprocessable_entity_with_error_shape() {
        let pipeline = Pipeline::default().with_error_shape::<ApiError>();

        let_assert!(
            Err(Error::Application { status, error }) =
                pipeline.process::<User>(response(422, r#"{"code":7,"message":"bad"}"#))
        );
        check!(status == 422);
        check!(
            error
                == ApiError {
                    code: 7,
                    message: "bad".to_string()
                }
        );
    }

    #[test]
    fn unparseable_error_body_keeps_status() {
        let pipeline = Pipeline::default().with_error_shape::<ApiError>();

        let_assert!(
            Err(Error::Decode(err)) = pipeline.process::<User>(response(500, "not json"))
        );
        check!(err.phase() == DecodePhase::Error { status: 500 });
        check!(err.status() == Some(500));
        check!(err.body().as_ref() == b"not json");
        let_assert!(DecodeFailure::Json { .. } = err.cause());
    }

    #[test]
    fn invalid_success_body_is_invalid_data() {
        let pipeline = Pipeline::default().with_error_shape::<ApiError>();

        let_assert!(
            Err(Error::Decode(err)) = pipeline.process::<User>(response(200, r#"{"id":"one"}"#))
        );
        check!(err.phase() == DecodePhase::Success);
        check!(err.body().as_ref() == br#"{"id":"one"}"#);
        check!(err.to_string().contains("id"));
    }

    #[test]
    fn explicit_error_status_without_decoder_is_missing_decoder() {
        let config = PipelineConfig::builder()
            .error_status(409)
            .build()
            .expect("config");
        let pipeline = Pipeline::new(config);

        let result = pipeline.process::<User>(response(409, r#"{"code":1,"message":"dup"}"#));
        let_assert!(Err(err) = result);
        check!(err.is_missing_error_decoder());
        check!(err.status() == Some(409));

        // Other statuses keep the plain status error
        let_assert!(
            Err(Error::Status { status: 404, .. }) = pipeline.process::<User>(response(404, ""))
        );
    }

    #[test]
    fn explicit_error_status_with_decoder() {
        let config = PipelineConfig::builder()
            .error_status(409)
            .build()
            .expect("config");
        let pipeline = Pipeline::new(config).with_error_shape::<ApiError>();

        let result = pipeline.process::<User>(response(409, r#"{"code":1,"message":"dup"}"#));
        let_assert!(Err(Error::Application { status: 409, error }) = result);
        check!(error.message == "dup");
    }

    #[test]
    fn custom_error_decoder_closure() {
        let pipeline = Pipeline::default().with_error_decoder(|status: u16, body: &Bytes| {
            Ok::<_, DecodeFailure>(format!("{status}:{}", String::from_utf8_lossy(body)))
        });

        let result = pipeline.process::<User>(response(503, "down"));
        let_assert!(Err(Error::Application { error, .. }) = result);
        check!(error == "503:down");
    }

    #[test]
    fn process_bytes_returns_body_untouched() {
        let pipeline = Pipeline::default();
        let body = pipeline
            .process_bytes(response(206, "partial"))
            .expect("success");
        check!(body.as_ref() == b"partial");
    }

    #[test]
    fn process_with_custom_builder() {
        let pipeline = Pipeline::default();

        let length = pipeline
            .process_with(response(200, "hello"), |body| Ok(body.len()))
            .expect("success");
        check!(length == 5);

        let result = pipeline.process_with(response(200, "hello"), |_| {
            Err::<usize, _>(DecodeFailure::custom("unsupported format"))
        });
        let_assert!(Err(Error::Decode(err)) = result);
        check!(err.cause() == &DecodeFailure::custom("unsupported format"));
    }

    #[test]
    fn process_with_meta_keeps_headers() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), "42".to_string());
        let raw = RawResponse::new(201, headers, r#"{"id":9,"user_name":"zed"}"#);

        let outcome = Pipeline::default().process_with_meta::<User>(raw);

        let_assert!(Some(meta) = &outcome.meta);
        check!(meta.status() == 201);
        check!(meta.header("X-Request-Id") == Some("42"));
        let_assert!(Ok(user) = outcome.into_result());
        check!(user.user_name == "zed");
    }

    #[test]
    fn transport_failure_short_circuits() {
        let pipeline = Pipeline::default().with_error_shape::<ApiError>();

        let outcome = pipeline.complete::<User>(Err(TransportError::connection("refused")));

        check!(outcome.meta.is_none());
        let_assert!(Err(Error::Transport(err)) = outcome.result);
        check!(err.is_connection());
    }

    #[test]
    fn round_trip_through_pipeline() {
        let user = User {
            id: 11,
            user_name: "eve".to_string(),
        };
        let body = serde_json::to_vec(&user).expect("serialize");

        let decoded: User = Pipeline::default()
            .process(RawResponse::from_status(200, body))
            .expect("success");
        check!(decoded == user);
    }

    #[test]
    fn observer_sees_body_only_when_enabled() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let observer = move |status: u16, body: &str| {
            sink.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push((status, body.to_string()));
        };

        let quiet = Pipeline::default().with_body_observer(observer.clone());
        let _ = quiet.process::<User>(response(404, "nope"));
        check!(
            seen.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .is_empty()
        );

        let config = PipelineConfig::builder()
            .log_body(true)
            .build()
            .expect("config");
        let loud = Pipeline::new(config).with_body_observer(observer);
        let result = loud.process::<User>(response(404, "nope"));

        // Observation does not alter the outcome
        let_assert!(Err(Error::Status { status: 404, .. }) = result);
        let entries = seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        check!(entries == vec![(404, "nope".to_string())]);
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
        assert_send_sync::<Pipeline<JsonErrorDecoder<ApiError>>>();
    }
}
