//! The transport seam.
//!
//! The pipeline never performs I/O. A [`RequestExecutor`] issues the request
//! and hands back a buffered [`RawResponse`]; implement it to plug in any
//! HTTP stack, or to serve canned responses in tests.

use std::future::Future;

use bytes::Bytes;

use crate::{RawResponse, TransportError};

/// Performs one HTTP call.
///
/// # Example
///
/// ```
/// use std::future::Future;
///
/// use bytes::Bytes;
/// use verdict_core::{RawResponse, RequestExecutor, TransportError};
///
/// /// Answers every request with the same response.
/// struct Canned(RawResponse);
///
/// impl RequestExecutor for Canned {
///     fn execute(
///         &self,
///         _request: http::Request<Bytes>,
///     ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
///         let response = self.0.clone();
///         async move { Ok(response) }
///     }
/// }
/// ```
pub trait RequestExecutor: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// Any status code is a successful execution; only failures to obtain a
    /// response are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

impl<X: RequestExecutor> RequestExecutor for &X {
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}

impl<X: RequestExecutor> RequestExecutor for std::sync::Arc<X> {
    fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}
