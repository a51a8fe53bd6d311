//! Error types for verdict.
//!
//! [`Error`] is the discriminated outcome of a failed call. Each variant is
//! mutually exclusive with the others:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`Error::Transport`] | the call itself failed, no status code available |
//! | [`Error::Status`] | non-success status and no error decoder configured |
//! | [`Error::Application`] | non-success status, body decoded into the error shape |
//! | [`Error::Decode`] | the body did not match the requested shape |
//! | [`Error::MissingErrorDecoder`] | an application error was expected but no decoder was supplied |

use std::convert::Infallible;
use std::fmt;

use bytes::Bytes;
use derive_more::{Display, Error};

// ============================================================================
// Transport Error
// ============================================================================

/// Failure of the underlying call, raised before any status code is known.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    Timeout,

    /// The request could not be issued as given.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

// ============================================================================
// Decode Errors
// ============================================================================

/// Why a body could not be turned into the requested shape.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DecodeFailure {
    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    Json {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Failure reported by a caller-supplied decoder.
    #[display("{_0}")]
    Custom(#[error(not(source))] String),
}

impl DecodeFailure {
    /// Create a JSON deserialization failure with path context.
    #[must_use]
    pub fn json(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Json {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a failure from a caller-supplied decoder.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Which decode branch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DecodePhase {
    /// The success payload did not match (a.k.a. invalid data).
    #[display("success")]
    Success,

    /// The application error payload did not match.
    #[display("error (status {status})")]
    Error {
        /// Status code of the response whose error body failed to decode.
        status: u16,
    },
}

/// A body that failed to decode on either branch.
#[derive(Debug, Clone, Display, Error)]
#[display("failed to decode {phase} payload: {cause}")]
pub struct DecodeError {
    phase: DecodePhase,
    #[error(source)]
    cause: DecodeFailure,
    body: Bytes,
}

impl DecodeError {
    /// Failure on the success branch.
    #[must_use]
    pub const fn invalid_data(cause: DecodeFailure, body: Bytes) -> Self {
        Self {
            phase: DecodePhase::Success,
            cause,
            body,
        }
    }

    /// Failure on the application-error branch.
    #[must_use]
    pub const fn error_payload(status: u16, cause: DecodeFailure, body: Bytes) -> Self {
        Self {
            phase: DecodePhase::Error { status },
            cause,
            body,
        }
    }

    /// Branch that failed.
    #[must_use]
    pub const fn phase(&self) -> DecodePhase {
        self.phase
    }

    /// Underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &DecodeFailure {
        &self.cause
    }

    /// Original, untouched body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Status code, kept only for error-branch failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self.phase {
            DecodePhase::Success => None,
            DecodePhase::Error { status } => Some(status),
        }
    }
}

// ============================================================================
// Configuration Error
// ============================================================================

/// Rejected [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// The success range contains no status code.
    #[display("empty success range {start}..={end}")]
    EmptySuccessRange {
        /// First status of the range.
        start: u16,
        /// Last status of the range.
        end: u16,
    },

    /// The explicit error status is shadowed by the success range.
    #[display("error status {status} lies inside the success range {start}..={end}")]
    UnreachableErrorStatus {
        /// The explicit error status.
        status: u16,
        /// First status of the range.
        start: u16,
        /// Last status of the range.
        end: u16,
    },
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for verdict operations.
///
/// `E` is the application error shape; it defaults to [`Infallible`] for
/// pipelines without an error decoder.
#[derive(Debug)]
pub enum Error<E = Infallible> {
    /// The call failed before a response was available.
    Transport(TransportError),

    /// Non-success status with no application error shape.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: Bytes,
    },

    /// Non-success status whose body decoded into the error shape.
    Application {
        /// HTTP status code.
        status: u16,
        /// Decoded application error.
        error: E,
    },

    /// The body did not match the requested shape.
    Decode(DecodeError),

    /// An application error status was selected but no error decoder exists.
    MissingErrorDecoder {
        /// HTTP status code.
        status: u16,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T, E = Infallible> = std::result::Result<T, Error<E>>;

impl<E> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "transport error: {err}"),
            Self::Status { status, .. } => write!(f, "HTTP error {status}"),
            Self::Application { status, .. } => write!(f, "application error {status}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::MissingErrorDecoder { status } => write!(
                f,
                "status {status} expects an application error but no error decoder is configured"
            ),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Status { .. } | Self::Application { .. } | Self::MissingErrorDecoder { .. } => {
                None
            }
        }
    }
}

impl<E> From<TransportError> for Error<E> {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl<E> From<DecodeError> for Error<E> {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl<E> Error<E> {
    /// Returns the HTTP status code, if a response was received.
    ///
    /// Success-branch decode failures do not keep their status.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. }
            | Self::Application { status, .. }
            | Self::MissingErrorDecoder { status } => Some(*status),
            Self::Decode(err) => err.status(),
            Self::Transport(_) => None,
        }
    }

    /// Returns `true` if the call itself failed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a transport timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout))
    }

    /// Returns `true` if a body failed to decode.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns `true` if this is a configuration mistake rather than a runtime fault.
    #[must_use]
    pub const fn is_missing_error_decoder(&self) -> bool {
        matches!(self, Self::MissingErrorDecoder { .. })
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Decoded application error, if any.
    #[must_use]
    pub const fn application(&self) -> Option<&E> {
        match self {
            Self::Application { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Consume into the decoded application error, if any.
    #[must_use]
    pub fn into_application(self) -> Option<E> {
        match self {
            Self::Application { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Raw body kept by status and decode errors.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::Decode(err) => Some(err.body()),
            _ => None,
        }
    }

    /// Transform the application error with a function.
    pub fn map_application<F, E2>(self, f: F) -> Error<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Transport(err) => Error::Transport(err),
            Self::Status { status, body } => Error::Status { status, body },
            Self::Application { status, error } => Error::Application {
                status,
                error: f(error),
            },
            Self::Decode(err) => Error::Decode(err),
            Self::MissingErrorDecoder { status } => Error::MissingErrorDecoder { status },
        }
    }

    /// Try to decode the kept body as JSON.
    ///
    /// Returns `None` when no body was kept.
    pub fn decode_body<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Option<std::result::Result<T, DecodeFailure>> {
        self.body().map(|body| crate::from_json(body))
    }
}
