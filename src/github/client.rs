use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_GITHUB_URL;
use crate::error::{Error, Result, Service};
use crate::github::provider::IssueProvider;
use crate::github::query::{
    GraphQlError, GraphQlRequest, GraphQlResponse, IssueData, IssueVariables, RepositoryIdData,
    RepositoryVariables, ISSUE_QUERY, REPOSITORY_ID_QUERY,
};
use crate::models::{IssueDetails, RepositoryId, RepositoryRef};

pub struct GitHubClient {
    client: Client,
    graphql_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_url(token, DEFAULT_GITHUB_URL)
    }

    pub fn with_url(token: &str, graphql_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("peekabow/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            graphql_url: graphql_url.to_string(),
        })
    }

    async fn query<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<GraphQlResponse<T>>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.graphql_url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| Error::unavailable(Service::GitHub, operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(Service::GitHub, operation, status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::unavailable(Service::GitHub, operation, e))?;

        serde_json::from_str(&body).map_err(|e| Error::unexpected(Service::GitHub, operation, e))
    }
}

fn rejected(operation: &str, errors: &[GraphQlError]) -> Error {
    Error::Rejected {
        service: Service::GitHub,
        operation: operation.to_string(),
        message: errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    }
}

#[async_trait]
impl IssueProvider for GitHubClient {
    async fn repository_id(&self, repository: &RepositoryRef) -> Result<RepositoryId> {
        let operation = format!("resolving the id of {}", repository);
        tracing::debug!("Querying repository id: {}", repository);

        let variables = RepositoryVariables {
            owner: &repository.owner,
            repo: &repository.name,
        };
        let response: GraphQlResponse<RepositoryIdData> =
            self.query(&operation, REPOSITORY_ID_QUERY, variables).await?;

        if response.errors.iter().any(GraphQlError::is_not_found) {
            return Err(Error::RepoNotFound(repository.to_string()));
        }
        if !response.errors.is_empty() {
            return Err(rejected(&operation, &response.errors));
        }

        let node = response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| Error::RepoNotFound(repository.to_string()))?;

        node.database_id
            .map(RepositoryId)
            .ok_or_else(|| Error::unexpected(Service::GitHub, &operation, "missing databaseId"))
    }

    async fn issue(&self, repository: &RepositoryRef, number: u64) -> Result<Option<IssueDetails>> {
        let operation = format!("looking up issue #{} in {}", number, repository);
        tracing::debug!("Querying issue #{}", number);

        let variables = IssueVariables {
            owner: &repository.owner,
            repo: &repository.name,
            number,
        };
        let response: GraphQlResponse<IssueData> =
            self.query(&operation, ISSUE_QUERY, variables).await?;

        if !response.errors.is_empty() {
            if response.errors.iter().all(GraphQlError::is_not_found) {
                return Ok(None);
            }
            return Err(rejected(&operation, &response.errors));
        }

        Ok(response
            .data
            .and_then(|d| d.repository)
            .and_then(|r| r.issue_or_pull_request)
            .and_then(|node| node.into_details()))
    }
}
