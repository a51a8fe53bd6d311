//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use verdict_core::prelude::*;
//! ```

pub use crate::{
    Branch, DecodeFailure, Error, ErrorDecoder, KeyDecoding, Outcome, Pipeline, PipelineConfig,
    RawResponse, RequestExecutor, ResponseMeta, Result, TransportError, decode_json, from_json,
};
