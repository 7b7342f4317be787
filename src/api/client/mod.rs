//! GraphQL client implementation and request orchestration.

mod helpers;
mod http;
mod types;

use bytes::Bytes;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::executor::{DEFAULT_BODY_LIMIT, RequestExecutor};
use crate::error::QueryError;
use crate::query::{Node, NodeFragment, QueryRenderable};

use self::helpers::{BODY_SNIPPET_LEN, build_request, snippet};

pub use self::http::{DEFAULT_TIMEOUT, ReqwestExecutor};
pub use self::types::{Endpoint, Token};


/// Typed query pipeline over the GitHub GraphQL API.
///
/// Each call to [`query`](Self::query) is a single round trip: render the
/// document, POST it, check the status, collect the body under the size cap
/// and decode. Calls share nothing but the executor, so one client can serve
/// any number of concurrent queries.
#[derive(Debug)]
pub struct GraphQLClient<E> {
    executor: E,
    endpoint: Endpoint,
    body_limit: usize,
}

impl<E: RequestExecutor> GraphQLClient<E> {
    /// Create a client using the standard GitHub endpoint.
    pub fn new(executor: E) -> Self {
        Self::with_endpoint(executor, Endpoint::default())
    }

    /// Create a client targeting a custom API endpoint.
    pub fn with_endpoint(executor: E, endpoint: impl Into<Endpoint>) -> Self {
        Self {
            executor,
            endpoint: endpoint.into(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Override the maximum number of response body bytes collected per
    /// query. Defaults to [`DEFAULT_BODY_LIMIT`].
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Transport used for every query.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Fetch the object addressed by `id` and decode it as `T`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Http`] when the status is not `200 OK`; the body is
    ///   left unread.
    /// - [`QueryError::Decoding`] when the body is text that does not match
    ///   `T`.
    /// - [`QueryError::CharacterSet`] when the body matches neither `T` nor
    ///   UTF-8.
    /// - [`QueryError::Transport`], [`QueryError::BodyTooLarge`] and
    ///   [`QueryError::Encode`] are passed through from the layers below.
    pub async fn query<T>(&self, id: &str) -> Result<T, QueryError>
    where
        T: QueryRenderable + DeserializeOwned,
    {
        let document = T::render_query(id);
        let request = build_request(&self.endpoint, &document)?;
        debug!("POST {} for node {id}", self.endpoint);

        let response = self.executor.execute(request).await?;
        if response.status != StatusCode::OK {
            debug!("node {id}: HTTP status {}", response.status);
            return Err(QueryError::Http(Box::new(response)));
        }

        let body = response.body.collect(self.body_limit).await?;
        debug!("node {id}: collected {} bytes", body.len());
        decode(body)
    }

    /// Fetch a node through the `node(id:)` root field.
    ///
    /// # Errors
    ///
    /// Same as [`query`](Self::query).
    pub async fn query_node<T: NodeFragment>(&self, id: &str) -> Result<T, QueryError> {
        self.query::<Node<T>>(id).await.map(Node::into_inner)
    }
}

/// Decode `body` as `T`, falling back to a text or raw-bytes diagnostic.
fn decode<T: DeserializeOwned>(body: Bytes) -> Result<T, QueryError> {
    let message = {
        let mut de = serde_json::Deserializer::from_slice(&body);
        match serde_path_to_error::deserialize::<_, T>(&mut de) {
            Ok(value) => match de.end() {
                Ok(()) => return Ok(value),
                Err(e) => e.to_string(),
            },
            Err(e) => {
                let path = e.path().to_string();
                format!("{} at {path}", e.into_inner())
            }
        }
    };
    match std::str::from_utf8(&body) {
        Ok(text) => {
            warn!(
                "response did not match the expected schema: {message} | body snippet: {}",
                snippet(text, BODY_SNIPPET_LEN)
            );
            Err(QueryError::Decoding {
                body: text.to_owned(),
                message: message.into(),
            })
        }
        Err(_) => {
            warn!("undecodable response body is not UTF-8 ({} bytes)", body.len());
            Err(QueryError::CharacterSet(body))
        }
    }
}
