//! Helper utilities for GraphQL request handling.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use super::types::{Endpoint, GraphQLRequest, Token};
use crate::api::HttpRequest;
use crate::error::TransportError;

/// Maximum number of characters of a response body kept in log lines.
pub(super) const BODY_SNIPPET_LEN: usize = 500;

/// Trim `text` to `max` characters, appending `...` when truncated.
///
/// Returns an empty string when `max` is zero.
pub(super) fn snippet(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out = text.chars().take(max).collect::<String>();
        out.push_str("...");
        out
    }
}

/// Serialize `query` into a POST request against `endpoint`.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the envelope cannot be serialized.
pub(super) fn build_request(
    endpoint: &Endpoint,
    query: &str,
) -> Result<HttpRequest, serde_json::Error> {
    let body = serde_json::to_vec(&GraphQLRequest { query })?;
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(HttpRequest {
        method: Method::POST,
        url: endpoint.clone(),
        headers,
        body: Bytes::from(body),
    })
}

/// Build standard GitHub headers with an optional authorization token.
pub(super) fn build_headers(token: &Token) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("ghql"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    if !token.is_empty() {
        let mut value: HeaderValue = format!("Bearer {}", token.as_str())
            .parse()
            .map_err(|e| TransportError::new("parse Authorization header", e))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::{Endpoint, Token, build_headers, build_request, snippet};
    use reqwest::Method;
    use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("", 3, "")]
    #[case("abc", 0, "")]
    #[case("abc", 3, "abc")]
    #[case("abcd", 3, "abc...")]
    #[case("👍👍👍", 2, "👍👍...")]
    fn snippet_cases(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(snippet(text, max), expected);
    }

    #[test]
    fn build_request_posts_json_envelope() {
        let endpoint = Endpoint::new("http://localhost/graphql");
        let req = build_request(&endpoint, r#"query { node(id: "R_1") { id } }"#)
            .expect("build request");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, endpoint);
        assert_eq!(
            req.headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        let body: Value = serde_json::from_slice(&req.body).expect("json body");
        assert_eq!(body, json!({"query": r#"query { node(id: "R_1") { id } }"#}));
    }

    #[test]
    fn build_headers_includes_base_headers_without_token() {
        let headers =
            build_headers(&Token::new("")).expect("failed to build headers without a token");
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(ACCEPT));
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn build_headers_marks_token_sensitive() {
        let headers =
            build_headers(&Token::new("token")).expect("failed to build headers with a token");
        let auth = headers
            .get(AUTHORIZATION)
            .expect("authorization header missing for token");
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().expect("ascii header"), "Bearer token");
    }

    #[test]
    fn build_headers_rejects_control_characters() {
        let err = build_headers(&Token::new("bad\ntoken")).expect_err("invalid header");
        assert!(err.to_string().contains("parse Authorization header"));
    }
}
