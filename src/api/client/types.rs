//! Types used by the GraphQL client.

use std::fmt;

use serde::Serialize;
use url::Url;

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// A GitHub API authentication token.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A GitHub GraphQL API endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Validate `url` as an absolute HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the string is not an absolute URL.
    /// Non-HTTP schemes are rejected with
    /// [`url::ParseError::RelativeUrlWithoutBase`] so callers only deal with
    /// one error type.
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(url::ParseError::RelativeUrlWithoutBase);
        }
        Ok(Self(url.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(GITHUB_GRAPHQL_URL.to_string())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a GraphQL request.
///
/// Only the document is sent; identifiers are inlined by the renderer.
#[derive(Debug, Serialize)]
pub(super) struct GraphQLRequest<'a> {
    pub(super) query: &'a str,
}
