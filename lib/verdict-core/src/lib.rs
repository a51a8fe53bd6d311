//! Core types for verdict: classify an HTTP response and decode it into a
//! typed success value or a typed application error.
//!
//! This crate performs no I/O. It provides:
//! - [`RawResponse`] - status, headers and buffered body handed over by a transport
//! - [`Classifier`] and [`Branch`] - status code classification
//! - [`KeyDecoding`] - object key naming strategy for JSON payloads
//! - [`decode_json`] and [`ErrorDecoder`] - payload decoding for both branches
//! - [`Pipeline`] - assembles classification and decoding into one result
//! - [`Error`] and [`Result`] - the error taxonomy
//! - [`PipelineConfig`] - configuration
//! - [`RequestExecutor`] - the transport seam

mod classify;
mod config;
mod decode;
mod error;
mod executor;
mod keys;
mod pipeline;
pub mod prelude;
mod response;

pub use classify::{Branch, Classifier, SuccessRange};
pub use config::{LogLevel, PipelineConfig, PipelineConfigBuilder};
pub use decode::{ErrorDecoder, JsonErrorDecoder, NoErrorDecoder, decode_json, from_json};
pub use error::{
    ConfigError, DecodeError, DecodeFailure, DecodePhase, Error, Result, TransportError,
};
pub use executor::RequestExecutor;
pub use keys::KeyDecoding;
pub use pipeline::{BodyObserver, Outcome, Pipeline, TracingObserver};
pub use response::{RawResponse, ResponseMeta, extract_headers};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
