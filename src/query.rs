//! Query descriptors: types that know how to ask for themselves.
//!
//! [`QueryRenderable`] is the only capability the pipeline needs. Most domain
//! types implement the narrower [`NodeFragment`] instead and are queried
//! through the [`Node`] wrapper, which renders the `node(id:)` lookup and
//! strips GitHub's `data.node` envelope on decode.

use std::fmt::Write as _;

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Render a complete GraphQL document fetching the object addressed by `id`.
///
/// Implementations must be pure: the same `id` always yields the same
/// document, and the identifier is inlined because requests carry no
/// variables.
pub trait QueryRenderable {
    fn render_query(id: &str) -> String;
}

/// Selection set for a type reachable through the `node(id:)` root field.
pub trait NodeFragment: DeserializeOwned {
    /// GraphQL type name used in the inline fragment.
    const TYPENAME: &'static str;
    /// Fields selected on [`Self::TYPENAME`].
    const SELECTION: &'static str;
}

/// Response wrapper for `query { node(id: ...) { ... } }`.
///
/// Decodes `{"data": {"node": {...}}}` into the inner fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node<T> {
    data: NodeData<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct NodeData<T> {
    node: T,
}

impl<T> Node<T> {
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data.node
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.data.node
    }
}

impl<T: NodeFragment> QueryRenderable for Node<T> {
    fn render_query(id: &str) -> String {
        format!(
            "query {{ node(id: {}) {{ ... on {} {{ {} }} }} }}",
            string_literal(id),
            T::TYPENAME,
            T::SELECTION
        )
    }
}

/// Quote `value` as a GraphQL string literal.
#[must_use]
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len().saturating_add(2));
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                // Writing to a String cannot fail.
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
