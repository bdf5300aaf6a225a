pub mod client;
pub mod provider;

pub use client::ZenHubClient;
pub use provider::BoardProvider;
