pub mod client;
pub mod provider;
pub mod query;

pub use client::GitHubClient;
pub use provider::IssueProvider;
