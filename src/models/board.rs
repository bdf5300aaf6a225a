use serde::{Deserialize, Serialize};

/// Snapshot of a repository's ZenHub board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub pipelines: Vec<Pipeline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    #[serde(default)]
    pub issues: Vec<BoardIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardIssue {
    pub issue_number: u64,
}

impl Board {
    /// Returns the first pipeline named exactly `name`. Later pipelines
    /// sharing the name are never considered.
    pub fn select(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}

impl Pipeline {
    /// Issue numbers in board order, duplicates included.
    pub fn issue_numbers(&self) -> Vec<u64> {
        self.issues.iter().map(|i| i.issue_number).collect()
    }
}
