//! Request and response descriptions exchanged with a [`RequestExecutor`].
//!
//! The executor owns the connection and credentials; the pipeline only sees a
//! status, headers and a lazily-polled body stream that it collects under a
//! byte cap.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use super::client::Endpoint;
use crate::error::{BoxError, QueryError, TransportError};

/// Default cap on the number of response body bytes collected per query.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// A prepared HTTP request.
///
/// The body is reference counted so decorators such as
/// [`RetryingExecutor`](super::retry::RetryingExecutor) can resend it
/// without copying.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Endpoint,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Response body that has not been read yet.
///
/// Nothing is pulled from the underlying stream until [`collect`] is called.
///
/// [`collect`]: ResponseBody::collect
pub struct ResponseBody {
    // The mutex only exists so the body is `Sync` and errors carrying it can
    // cross threads; it is never contended.
    stream: Mutex<ByteStream>,
}

impl ResponseBody {
    /// Wrap a stream of byte chunks, as produced by
    /// `reqwest::Response::bytes_stream`.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            stream: Mutex::new(Box::pin(stream.map(|chunk| chunk.map_err(Into::into)))),
        }
    }

    /// Body consisting of a single in-memory chunk.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(stream::once(async move { Ok::<_, BoxError>(bytes) }))
    }

    /// Body that yields no data.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_stream(stream::empty::<Result<Bytes, BoxError>>())
    }

    /// Read the whole body into memory, failing once more than `limit`
    /// bytes have arrived.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::BodyTooLarge`] when the stream yields more than
    /// `limit` bytes and [`QueryError::Transport`] when the stream itself
    /// fails. Data read before the failure is discarded.
    pub async fn collect(self, limit: usize) -> Result<Bytes, QueryError> {
        let mut stream = self
            .stream
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransportError::new("reading response body", e))?;
            if buf.len().saturating_add(chunk.len()) > limit {
                debug!(
                    "response body exceeded {limit} bytes after {} bytes",
                    buf.len()
                );
                return Err(QueryError::BodyTooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}

/// Response description returned by a [`RequestExecutor`].
#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Response with `status`, no headers and `body`.
    #[must_use]
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }
}

/// An authenticated HTTP transport.
///
/// Implementations attach credentials, own connection reuse and decide how
/// timeouts and cancellation surface; all of these reach the caller as a
/// [`TransportError`].
pub trait RequestExecutor {
    /// Send `request` and return the response without reading its body.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
