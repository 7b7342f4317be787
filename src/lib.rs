//! Typed node queries over the GitHub GraphQL API.
//!
//! A caller names a Rust type and an object identifier; the type renders its
//! own query document and the [`GraphQLClient`] sends it, checks the status,
//! collects a bounded body and decodes it.
//!
//! ```no_run
//! use ghql::{GraphQLClient, ReqwestExecutor, models::Repository};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphQLClient::new(ReqwestExecutor::new("ghp_token")?);
//! let repo: Repository = client.query_node("R_kgDOExample").await?;
//! println!("{}", repo.name_with_owner);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli_args;
pub mod config;
pub mod environment;
pub mod error;
pub mod models;
pub mod query;

pub use api::{Endpoint, GraphQLClient, ReqwestExecutor, RequestExecutor, Token};
pub use error::{QueryError, TransportError};
pub use query::{Node, NodeFragment, QueryRenderable};
