use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::IssueProvider;
use crate::models::RepositoryRef;
use crate::summary::enricher::IssueEnricher;
use crate::summary::formatter::format_summary;
use crate::zenhub::BoardProvider;

/// Everything a single run asks for. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub repository: RepositoryRef,
    pub pipeline: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Formatted lines, or the no-issues message.
    Report(String),
    /// No pipeline on the board carries the requested name.
    PipelineNotFound(String),
}

pub struct SummaryPipeline {
    github: Arc<dyn IssueProvider>,
    zenhub: Arc<dyn BoardProvider>,
    config: PipelineConfig,
}

impl SummaryPipeline {
    pub fn new(
        github: impl IssueProvider + 'static,
        zenhub: impl BoardProvider + 'static,
        config: PipelineConfig,
    ) -> Self {
        Self {
            github: Arc::new(github),
            zenhub: Arc::new(zenhub),
            config,
        }
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryOutcome> {
        // Step 1: Resolve the repository id
        tracing::info!("🔍  Search repository ID from GitHub...");
        let repository_id = self.github.repository_id(&request.repository).await?;
        tracing::info!("👍  Found repository ID: {}", repository_id);

        // Step 2: Fetch the board
        tracing::info!("🔍  Search pipeline issues from ZenHub...");
        let board = self.zenhub.board(repository_id).await?;

        // Step 3: Pick the pipeline
        let Some(pipeline) = board.select(&request.pipeline) else {
            tracing::info!(
                "No pipeline named {:?} among {} pipelines",
                request.pipeline,
                board.pipelines.len()
            );
            return Ok(SummaryOutcome::PipelineNotFound(request.pipeline.clone()));
        };
        let numbers = pipeline.issue_numbers();
        tracing::info!("Found {} issues in {}", numbers.len(), pipeline.name);

        // Step 4: Enrich with GitHub titles and URLs
        let progress = self.progress_bar(numbers.len());
        let lines = IssueEnricher::new(self.github.clone(), request.repository.clone())
            .with_concurrency(self.config.concurrency)
            .with_progress(progress.clone())
            .run(numbers)
            .await;
        progress.finish_and_clear();

        Ok(SummaryOutcome::Report(format_summary(&lines?)))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} issues",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        ProgressBar::new(len as u64).with_style(style)
    }
}
