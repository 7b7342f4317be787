//! Helpers for GitHub token resolution.
//!
//! Token resolution prefers explicit configuration (CLI/config file), then
//! `GHQL_GITHUB_TOKEN`, and finally `GITHUB_TOKEN`. Empty values are ignored.

use crate::api::Token;
use crate::cli_args::NodeArgs;
use crate::environment;

/// Resolve the token used to authenticate API requests.
#[must_use]
pub fn resolve_github_token(args: &NodeArgs) -> Token {
    args.github_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .or_else(|| environment::non_empty_var("GHQL_GITHUB_TOKEN"))
        .or_else(|| environment::non_empty_var("GITHUB_TOKEN"))
        .map(Token::new)
        .unwrap_or_else(|| Token::new(""))
}
