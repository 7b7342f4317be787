//! Typed GraphQL queries against the GitHub API.
//!
//! [`GraphQLClient`] is the query pipeline. It talks to the network only
//! through a [`RequestExecutor`]; [`ReqwestExecutor`] is the production
//! transport and [`retry::RetryingExecutor`] adds backoff around any
//! executor.

mod client;
mod executor;
pub mod retry;

pub use client::{DEFAULT_TIMEOUT, Endpoint, GraphQLClient, ReqwestExecutor, Token};
pub use executor::{DEFAULT_BODY_LIMIT, HttpRequest, HttpResponse, RequestExecutor, ResponseBody};
pub use retry::{RetryConfig, RetryingExecutor};
