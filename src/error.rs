//! Error types returned by the query pipeline and its executors.
//!
//! [`QueryError`] keeps the three failures synthesized by the pipeline
//! (`Http`, `CharacterSet`, `Decoding`) distinct from the failures it merely
//! propagates from below (`Transport`, `BodyTooLarge`, `Encode`).

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

use crate::api::HttpResponse;

/// Boxed error type carried by transports and body streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by a [`RequestExecutor`](crate::api::RequestExecutor)
/// before any response description was produced.
#[derive(Error, Debug)]
#[error("request failed when running {context}: {source}")]
pub struct TransportError {
    pub context: Box<str>,
    #[source]
    pub source: BoxError,
}

impl TransportError {
    /// Wrap `source` with a description of the operation that failed, such
    /// as `"POST https://api.github.com/graphql"`.
    pub fn new(context: impl Into<Box<str>>, source: impl Into<BoxError>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Failure of a single [`GraphQLClient::query`](crate::GraphQLClient::query)
/// call.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The API answered with a status other than `200 OK`.
    ///
    /// The response body has not been read; it is attached untouched so the
    /// caller can drain or log it.
    #[error("HTTP status {}", .0.status)]
    Http(Box<HttpResponse>),
    /// The body matched neither the target schema nor UTF-8.
    #[error("response body is not valid UTF-8 ({} bytes)", .0.len())]
    CharacterSet(Bytes),
    /// The body is text but does not match the target schema.
    #[error("failed to decode response: {message}")]
    Decoding { body: String, message: Box<str> },
    /// The executor failed before a response arrived, or the body stream
    /// broke while it was being read.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The body grew past the configured cap.
    #[error("response body exceeds the {limit} byte limit")]
    BodyTooLarge { limit: usize },
    /// The request envelope could not be serialized.
    #[error("failed to encode GraphQL request: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorMessage>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl QueryError {
    /// Whether this failure was produced by the pipeline itself rather than
    /// propagated from the transport or request encoding.
    #[must_use]
    pub fn is_core_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::CharacterSet(_) | Self::Decoding { .. }
        )
    }

    /// Extract GraphQL error messages from a [`QueryError::Decoding`] body.
    ///
    /// Returns `None` for every other variant, for bodies that are not a
    /// GraphQL `{"errors": [...]}` envelope and for an empty `errors` list.
    ///
    /// # Examples
    /// ```
    /// use ghql::QueryError;
    ///
    /// let err = QueryError::Decoding {
    ///     body: r#"{"errors":[{"message":"Could not resolve to a node"}]}"#.into(),
    ///     message: "missing field `data`".into(),
    /// };
    /// assert_eq!(
    ///     err.graphql_errors(),
    ///     Some(vec!["Could not resolve to a node".to_string()])
    /// );
    /// ```
    #[must_use]
    pub fn graphql_errors(&self) -> Option<Vec<String>> {
        let Self::Decoding { body, .. } = self else {
            return None;
        };
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        (!messages.is_empty()).then_some(messages)
    }
}
