//! Issue one HTTP request, get back a typed success value or a typed error.
//!
//! A response is classified by status code, then its body is decoded into
//! either the success shape or the application error shape:
//!
//! - status in `200..=206` → the body decodes into `T`
//! - any other status with an error shape → [`Error::Application`]
//! - any other status without one → [`Error::Status`]
//! - a body that does not match its shape → [`Error::Decode`]
//! - a call that never produced a response → [`Error::Transport`]
//!
//! # Example
//!
//! ```ignore
//! use verdict::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     user_name: String,
//! }
//!
//! let client = Client::hyper();
//! let user: User = client.get(&"https://api.example.com/users/42".parse()?).await?;
//! ```
//!
//! The classification and decoding core lives in `verdict-core` and is
//! re-exported here; this crate adds the [`HyperExecutor`] transport and the
//! [`Client`] that ties both together.

mod client;
mod config;
mod connector;
mod executor;
pub mod prelude;

pub use client::Client;
pub use config::{ExecutorConfig, ExecutorConfigBuilder};
pub use executor::HyperExecutor;

// Re-export core types
pub use verdict_core::{
    BodyObserver, Branch, Classifier, ConfigError, DecodeError, DecodeFailure, DecodePhase, Error,
    ErrorDecoder, JsonErrorDecoder, KeyDecoding, LogLevel, NoErrorDecoder, Outcome, Pipeline,
    PipelineConfig, PipelineConfigBuilder, RawResponse, RequestExecutor, ResponseMeta, Result,
    SuccessRange, TracingObserver, TransportError, decode_json, from_json,
};

// Re-export http types for status codes and headers
pub use verdict_core::{StatusCode, header};

// Re-export crates used in public signatures
pub use bytes;
pub use http;
pub use url;
