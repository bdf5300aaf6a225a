pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod zenhub;
pub mod summary;

pub use config::{Config, PipelineConfig};
pub use error::{Error, ErrorKind, Result};
pub use github::{GitHubClient, IssueProvider};
pub use zenhub::{BoardProvider, ZenHubClient};
pub use summary::{SummaryOutcome, SummaryPipeline, SummaryRequest};
