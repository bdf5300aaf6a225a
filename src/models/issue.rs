use std::fmt;

use serde::{Deserialize, Serialize};

/// Title and canonical URL of an issue as reported by GitHub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedIssue {
    pub number: u64,
    pub title: String,
    pub url: String,
}

impl EnrichedIssue {
    /// Keeps only lookups that produced an issue with a non-empty title.
    /// Anything else (no entity, a pull request, an inaccessible issue) is
    /// dropped from the summary.
    pub fn resolve(number: u64, details: Option<IssueDetails>) -> Option<Self> {
        let details = details.filter(|d| !d.title.is_empty())?;
        Some(Self {
            number,
            title: details.title,
            url: details.url,
        })
    }
}

/// Renders the summary line `#<number>: <title> : <url>`.
impl fmt::Display for EnrichedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {} : {}", self.number, self.title, self.url)
    }
}
