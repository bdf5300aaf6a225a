//! Turns a pipeline's bare issue numbers into summary lines.
//!
//! Two tasks cooperate over channels of capacity one: the number source
//! hands over one issue number at a time, and the enrichment stage looks
//! each number up on GitHub before asking for the next. Lines come out in
//! board order; numbers without an accessible issue are skipped.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::github::IssueProvider;
use crate::models::{EnrichedIssue, RepositoryRef};

pub struct IssueEnricher {
    provider: Arc<dyn IssueProvider>,
    repository: RepositoryRef,
    concurrency: usize,
    progress: ProgressBar,
}

impl IssueEnricher {
    pub fn new(provider: Arc<dyn IssueProvider>, repository: RepositoryRef) -> Self {
        Self {
            provider,
            repository,
            concurrency: 1,
            progress: ProgressBar::hidden(),
        }
    }

    /// Allows up to `concurrency` lookups in flight. Output order is
    /// unchanged; 0 is treated as 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Spawns the number source. It stops early if the receiving side goes away.
    pub fn number_source(numbers: Vec<u64>) -> (mpsc::Receiver<u64>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            for number in numbers {
                if tx.send(number).await.is_err() {
                    break;
                }
            }
        });
        (rx, handle)
    }

    /// Spawns the enrichment stage. The output channel closes once the
    /// input is exhausted, or right after the first error is sent.
    pub fn spawn(
        self,
        numbers: mpsc::Receiver<u64>,
    ) -> (mpsc::Receiver<Result<String>>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let lookups = stream::unfold(numbers, |mut numbers| async move {
                numbers.recv().await.map(|number| (number, numbers))
            })
            .map(|number| self.enrich_one(number))
            .buffered(self.concurrency);
            tokio::pin!(lookups);

            while let Some(result) = lookups.next().await {
                match result {
                    Ok(Some(line)) => {
                        if tx.send(Ok(line)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }
        });
        (rx, handle)
    }

    /// Runs both stages to completion and collects the lines in order.
    pub async fn run(self, numbers: Vec<u64>) -> Result<Vec<String>> {
        let (numbers, source) = Self::number_source(numbers);
        let (mut lines_rx, stage) = self.spawn(numbers);

        let mut lines = Vec::new();
        while let Some(line) = lines_rx.recv().await {
            lines.push(line?);
        }

        stage.await?;
        source.await?;
        Ok(lines)
    }

    async fn enrich_one(&self, number: u64) -> Result<Option<String>> {
        let details = self.provider.issue(&self.repository, number).await?;
        self.progress.inc(1);

        match EnrichedIssue::resolve(number, details) {
            Some(issue) => Ok(Some(issue.to_string())),
            None => {
                tracing::debug!("Skipping #{}: no issue with a title", number);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Service};
    use crate::models::{IssueDetails, RepositoryId};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FakeGitHub {
        titles: HashMap<u64, &'static str>,
        fail_on: Option<u64>,
        delays: HashMap<u64, u64>,
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IssueProvider for FakeGitHub {
        async fn repository_id(&self, _: &RepositoryRef) -> Result<RepositoryId> {
            Ok(RepositoryId(1))
        }

        async fn issue(&self, _: &RepositoryRef, number: u64) -> Result<Option<IssueDetails>> {
            self.events.lock().unwrap().push(format!("start {}", number));
            let delay = self.delays.get(&number).copied().unwrap_or(1);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.events.lock().unwrap().push(format!("end {}", number));

            if self.fail_on == Some(number) {
                return Err(Error::Unavailable {
                    service: Service::GitHub,
                    operation: format!("looking up issue #{}", number),
                    reason: "connection reset".to_string(),
                });
            }
            Ok(self.titles.get(&number).map(|title| IssueDetails {
                title: title.to_string(),
                url: format!("http://x/{}", number),
            }))
        }
    }

    fn enricher(github: Arc<FakeGitHub>) -> IssueEnricher {
        IssueEnricher::new(github, RepositoryRef::new("acme", "widget"))
    }

    #[tokio::test]
    async fn test_unresolved_issues_are_dropped_in_order() {
        let github = Arc::new(FakeGitHub {
            titles: HashMap::from([(101, "Fix bug"), (103, "Ship it")]),
            ..Default::default()
        });

        let lines = enricher(github).run(vec![101, 102, 103]).await.unwrap();
        assert_eq!(
            lines,
            vec!["#101: Fix bug : http://x/101", "#103: Ship it : http://x/103"]
        );
    }

    #[tokio::test]
    async fn test_lookups_never_overlap_by_default() {
        let github = Arc::new(FakeGitHub {
            titles: HashMap::from([(1, "a"), (2, "b"), (3, "c")]),
            ..Default::default()
        });

        enricher(github.clone()).run(vec![1, 2, 3]).await.unwrap();
        let events = github.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["start 1", "end 1", "start 2", "end 2", "start 3", "end 3"]
        );
    }

    #[tokio::test]
    async fn test_error_aborts_the_run() {
        let github = Arc::new(FakeGitHub {
            titles: HashMap::from([(1, "a"), (2, "b"), (3, "c")]),
            fail_on: Some(2),
            ..Default::default()
        });

        let err = enricher(github.clone()).run(vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, Error::Unavailable { .. }));
        assert!(!github.events.lock().unwrap().contains(&"start 3".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_keep_board_order() {
        let github = Arc::new(FakeGitHub {
            titles: HashMap::from([(1, "a"), (2, "b"), (3, "c"), (4, "d")]),
            delays: HashMap::from([(1, 40), (2, 5), (3, 20), (4, 1)]),
            ..Default::default()
        });

        let lines = enricher(github)
            .with_concurrency(4)
            .run(vec![1, 2, 3, 4])
            .await
            .unwrap();
        let numbers: Vec<_> = lines.iter().map(|l| l.split(':').next().unwrap()).collect();
        assert_eq!(numbers, vec!["#1", "#2", "#3", "#4"]);
    }

    #[tokio::test]
    async fn test_duplicates_and_empty_input() {
        let github = Arc::new(FakeGitHub {
            titles: HashMap::from([(5, "dup")]),
            ..Default::default()
        });

        let lines = enricher(github.clone()).run(vec![5, 5]).await.unwrap();
        assert_eq!(lines.len(), 2);

        assert!(enricher(github).run(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_number_source_preserves_order() {
        let (mut rx, handle) = IssueEnricher::number_source(vec![3, 1, 2]);
        let mut seen = Vec::new();
        while let Some(number) = rx.recv().await {
            seen.push(number);
        }
        handle.await.unwrap();
        assert_eq!(seen, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_number_source_waits_for_each_handoff() {
        let (mut rx, handle) = IssueEnricher::number_source((1..=5).collect());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        assert_eq!(rx.recv().await, Some(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        drop(rx);
        handle.await.unwrap();
    }
}
