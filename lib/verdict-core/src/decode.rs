//! Payload decoding for both branches of a response.
//!
//! - [`decode_json`] turns a success body into the caller's type
//! - [`ErrorDecoder`] turns a non-success body into the caller's error type

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{DecodeFailure, KeyDecoding};

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so failures name the exact field that did not
/// match (e.g. `"user.address.city"`).
///
/// # Example
///
/// ```
/// use verdict_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let bytes = br#"{"name":"Alice"}"#;
/// let user: User = from_json(bytes).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeFailure> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| DecodeFailure::json(e.path().to_string(), e.inner().to_string()))
}

/// Deserialize JSON bytes after applying a key naming strategy.
///
/// With [`KeyDecoding::UseDefaultKeys`] this is [`from_json`]; otherwise the
/// document is parsed once, its keys rewritten, then mapped onto `T`.
///
/// # Example
///
/// ```
/// use verdict_core::{KeyDecoding, decode_json};
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct User { user_name: String }
///
/// let bytes = br#"{"user_name":"ann"}"#;
/// let user: User = decode_json(bytes, &KeyDecoding::ConvertFromSnakeCase).expect("deserialize");
/// assert_eq!(user.user_name, "ann");
/// ```
pub fn decode_json<T: DeserializeOwned>(
    bytes: &[u8],
    keys: &KeyDecoding,
) -> Result<T, DecodeFailure> {
    if !keys.rewrites_keys() {
        return from_json(bytes);
    }

    let document: serde_json::Value = from_json(bytes)?;
    serde_path_to_error::deserialize(keys.apply(document)?)
        .map_err(|e| DecodeFailure::json(e.path().to_string(), e.inner().to_string()))
}

// ============================================================================
// Error Decoder Trait
// ============================================================================

/// Trait for decoding non-success bodies into typed application errors.
///
/// Closures `Fn(u16, &Bytes) -> Result<E, DecodeFailure>` implement it, so an
/// ad-hoc decoder needs no new type.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use verdict_core::{DecodeFailure, ErrorDecoder};
///
/// let decoder = |status: u16, body: &Bytes| -> Result<String, DecodeFailure> {
///     std::str::from_utf8(body)
///         .map(|text| format!("{status}: {text}"))
///         .map_err(|e| DecodeFailure::custom(e.to_string()))
/// };
///
/// let error = decoder.decode(503, &Bytes::from("maintenance")).expect("decode");
/// assert_eq!(error, "503: maintenance");
/// ```
pub trait ErrorDecoder: Send + Sync + 'static {
    /// The decoded error type.
    type Error: fmt::Debug + Send + Sync + 'static;

    /// Decode the body of a non-success response.
    fn decode(&self, status: u16, body: &Bytes) -> Result<Self::Error, DecodeFailure>;
}

impl<F, E> ErrorDecoder for F
where
    F: Fn(u16, &Bytes) -> Result<E, DecodeFailure> + Send + Sync + 'static,
    E: fmt::Debug + Send + Sync + 'static,
{
    type Error = E;

    fn decode(&self, status: u16, body: &Bytes) -> Result<Self::Error, DecodeFailure> {
        self(status, body)
    }
}

/// Placeholder decoder type for pipelines without an error shape.
///
/// It has no values, so a pipeline parameterized by it can never hold one.
#[derive(Debug, Clone, Copy)]
pub enum NoErrorDecoder {}

impl ErrorDecoder for NoErrorDecoder {
    type Error = std::convert::Infallible;

    fn decode(&self, _status: u16, _body: &Bytes) -> Result<Self::Error, DecodeFailure> {
        match *self {}
    }
}

/// Decodes error bodies as JSON into `E`.
pub struct JsonErrorDecoder<E> {
    keys: KeyDecoding,
    _shape: PhantomData<fn() -> E>,
}

impl<E> JsonErrorDecoder<E> {
    /// Decoder using the given key naming strategy.
    #[must_use]
    pub const fn new(keys: KeyDecoding) -> Self {
        Self {
            keys,
            _shape: PhantomData,
        }
    }

    /// Key naming strategy in use.
    #[must_use]
    pub const fn keys(&self) -> &KeyDecoding {
        &self.keys
    }
}

impl<E> Default for JsonErrorDecoder<E> {
    fn default() -> Self {
        Self::new(KeyDecoding::default())
    }
}

impl<E> Clone for JsonErrorDecoder<E> {
    fn clone(&self) -> Self {
        Self::new(self.keys)
    }
}

impl<E> fmt::Debug for JsonErrorDecoder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonErrorDecoder")
            .field("shape", &std::any::type_name::<E>())
            .field("keys", &self.keys)
            .finish()
    }
}

impl<E> ErrorDecoder for JsonErrorDecoder<E>
where
    E: DeserializeOwned + fmt::Debug + Send + Sync + 'static,
{
    type Error = E;

    fn decode(&self, _status: u16, body: &Bytes) -> Result<Self::Error, DecodeFailure> {
        decode_json(body, &self.keys)
    }
}
