//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use verdict::prelude::*;
//! ```

pub use crate::{
    Client, DecodeFailure, Error, ErrorDecoder, ExecutorConfig, HyperExecutor, KeyDecoding,
    Outcome, Pipeline, PipelineConfig, RawResponse, RequestExecutor, ResponseMeta, Result,
    StatusCode, TransportError, header,
};
pub use serde::{Deserialize, Serialize};
