pub mod enricher;
pub mod formatter;
pub mod pipeline;

pub use enricher::IssueEnricher;
pub use formatter::{format_summary, NO_ISSUES_MESSAGE};
pub use pipeline::{SummaryOutcome, SummaryPipeline, SummaryRequest};
