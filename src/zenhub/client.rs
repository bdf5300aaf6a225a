use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::DEFAULT_ZENHUB_URL;
use crate::error::{Error, Result, Service};
use crate::models::{Board, RepositoryId};
use crate::zenhub::provider::BoardProvider;

const AUTH_HEADER: &str = "x-authentication-token";

pub struct ZenHubClient {
    client: Client,
    base_url: String,
}

impl ZenHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_url(token, DEFAULT_ZENHUB_URL)
    }

    pub fn with_url(token: &str, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(AUTH_HEADER, header::HeaderValue::from_str(token)?);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn board_url(&self, repository_id: RepositoryId) -> String {
        format!("{}/p1/repositories/{}/board", self.base_url, repository_id)
    }
}

#[async_trait]
impl BoardProvider for ZenHubClient {
    async fn board(&self, repository_id: RepositoryId) -> Result<Board> {
        let operation = format!("fetching the board of repository {}", repository_id);
        let url = self.board_url(repository_id);
        tracing::debug!("Fetching: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::unavailable(Service::ZenHub, &operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(Service::ZenHub, &operation, status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::unavailable(Service::ZenHub, &operation, e))?;

        serde_json::from_str(&body).map_err(|e| Error::unexpected(Service::ZenHub, &operation, e))
    }
}
