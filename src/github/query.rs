use serde::{Deserialize, Serialize};

use crate::models::IssueDetails;

pub const REPOSITORY_ID_QUERY: &str = r#"query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    databaseId
  }
}"#;

pub const ISSUE_QUERY: &str = r#"query($owner: String!, $repo: String!, $number: Int!) {
  repository(owner: $owner, name: $repo) {
    issueOrPullRequest(number: $number) {
      __typename
      ... on Issue {
        title
        url
      }
    }
  }
}"#;

#[derive(Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl GraphQlError {
    pub fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}

#[derive(Serialize)]
pub struct RepositoryVariables<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
}

#[derive(Serialize)]
pub struct IssueVariables<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub number: u64,
}

#[derive(Deserialize)]
pub struct RepositoryIdData {
    pub repository: Option<RepositoryIdNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryIdNode {
    pub database_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct IssueData {
    pub repository: Option<IssueRepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRepositoryNode {
    pub issue_or_pull_request: Option<IssueOrPullRequest>,
}

#[derive(Deserialize)]
pub struct IssueOrPullRequest {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl IssueOrPullRequest {
    /// Only the `Issue` variant carries details; pull requests yield nothing.
    pub fn into_details(self) -> Option<IssueDetails> {
        if self.typename != "Issue" {
            return None;
        }
        Some(IssueDetails {
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
        })
    }
}
