//! Command-line argument structures.
//!
//! Isolates clap derivations so lint expectations remain scoped, keeping
//! `main.rs` focused on runtime logic.

use clap::Parser;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Parameters shared by the `repo`, `issue` and `pr` sub-commands.
///
/// Values merge with precedence defaults < config file (`[cmds.node]` of a
/// discovered `.ghql.toml` or of `GHQL_CONFIG_PATH`) <
/// environment (`GHQLCMDS_NODE_*`) < command line.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "node")]
#[ortho_config(prefix = "GHQL")]
pub struct NodeArgs {
    /// Global node ID of the object to fetch
    #[arg(required = true)]
    // Clap marks the argument as required so parsing yields `Some(value)`. The
    // `Option` allows `NodeArgs::default()` and config merging to leave it unset.
    pub id: Option<String>,
    /// GitHub token for authenticated API requests
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,
    /// GraphQL endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
    /// Maximum response body size in bytes
    #[arg(long, value_name = "BYTES")]
    pub body_limit: Option<usize>,
    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<u64>,
    /// Retries after a failed connection
    #[arg(long, value_name = "N")]
    pub retries: Option<usize>,
}
