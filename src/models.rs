//! Domain types decoded from `node(id:)` lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::NodeFragment;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    pub name_with_owner: String,
    pub description: Option<String>,
    pub url: String,
    pub is_private: bool,
    pub stargazer_count: u64,
    pub created_at: DateTime<Utc>,
}

impl NodeFragment for Repository {
    const TYPENAME: &'static str = "Repository";
    const SELECTION: &'static str =
        "id name nameWithOwner description url isPrivate stargazerCount createdAt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub url: String,
    // Deleted accounts come back as `null`.
    pub author: Option<User>,
    pub created_at: DateTime<Utc>,
}

impl NodeFragment for Issue {
    const TYPENAME: &'static str = "Issue";
    const SELECTION: &'static str =
        "id number title body state url author { login } createdAt";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub state: PullRequestState,
    pub is_draft: bool,
    pub url: String,
    pub author: Option<User>,
    pub head_ref_name: String,
    pub base_ref_name: String,
    pub created_at: DateTime<Utc>,
}

impl NodeFragment for PullRequest {
    const TYPENAME: &'static str = "PullRequest";
    const SELECTION: &'static str = "id number title state isDraft url author { login } \
         headRefName baseRefName createdAt";
}
