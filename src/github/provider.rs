use async_trait::async_trait;

use crate::error::Result;
use crate::models::{IssueDetails, RepositoryId, RepositoryRef};

#[async_trait]
pub trait IssueProvider: Send + Sync {
    async fn repository_id(&self, repository: &RepositoryRef) -> Result<RepositoryId>;

    /// `Ok(None)` means there is no accessible issue with that number.
    async fn issue(&self, repository: &RepositoryRef, number: u64) -> Result<Option<IssueDetails>>;
}
