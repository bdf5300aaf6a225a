use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Board, RepositoryId};

#[async_trait]
pub trait BoardProvider: Send + Sync {
    async fn board(&self, repository_id: RepositoryId) -> Result<Board>;
}
