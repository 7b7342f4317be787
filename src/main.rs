//! `ghql`: print a GitHub object fetched by node ID.

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

use ghql::cli_args::NodeArgs;
use ghql::config::{ClientSettings, ConfigError, load_with_id_fallback};
use ghql::models::{Issue, PullRequest, Repository};
use ghql::{NodeFragment, QueryError};

/// Characters of an error response body echoed back to the user.
const ERROR_BODY_CHARS: usize = 500;

#[derive(Parser)]
#[command(
    name = "ghql",
    about = "Fetch GitHub objects by node ID over GraphQL",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a repository
    Repo(NodeArgs),
    /// Fetch an issue
    Issue(NodeArgs),
    /// Fetch a pull request
    Pr(NodeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Commands::Repo(args) => fetch::<Repository>(args).await,
        Commands::Issue(args) => fetch::<Issue>(args).await,
        Commands::Pr(args) => fetch::<PullRequest>(args).await,
    }
}

async fn fetch<T>(args: NodeArgs) -> anyhow::Result<()>
where
    T: NodeFragment + Serialize,
{
    let args = load_with_id_fallback(args).map_err(ConfigError::from)?;
    let id = args
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(ConfigError::MissingId)?;
    let settings = ClientSettings::from_args(&args)?;
    debug!("querying {} {id} at {}", T::TYPENAME, settings.endpoint);
    let client = settings.build_client()?;
    match client.query_node::<T>(&id).await {
        Ok(node) => {
            println!("{}", serde_json::to_string_pretty(&node)?);
            Ok(())
        }
        Err(err) => Err(report(err, settings.body_limit).await),
    }
}

/// Turn a query failure into a message worth showing on the terminal.
async fn report(err: QueryError, body_limit: usize) -> anyhow::Error {
    // An empty `errors` list yields `None`, so the decoder message is kept.
    if let Some(messages) = err.graphql_errors() {
        return anyhow!("API errors: {}", messages.join(", "));
    }
    match err {
        QueryError::Http(resp) => {
            let status = resp.status;
            match resp.body.collect(body_limit).await {
                Ok(body) if !body.is_empty() => {
                    let text = String::from_utf8_lossy(&body);
                    let snippet: String = text.chars().take(ERROR_BODY_CHARS).collect();
                    anyhow!("HTTP status {status} | body snippet: {snippet}")
                }
                _ => anyhow!("HTTP status {status}"),
            }
        }
        other => other.into(),
    }
}
