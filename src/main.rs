use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use peekabow::config::CONFIG_EXAMPLE;
use peekabow::models::RepositoryRef;
use peekabow::{
    Config, Error, GitHubClient, PipelineConfig, SummaryOutcome, SummaryPipeline, SummaryRequest,
    ZenHubClient,
};

#[derive(Parser, Debug)]
#[command(name = "peekabow")]
#[command(version = "0.1.0")]
#[command(about = "Show your repo's summary of ZenHub pipeline")]
struct Args {
    /// Repository owner
    #[arg(short, long, global = true)]
    owner: Option<String>,

    /// Repository name
    #[arg(short, long, global = true)]
    repo: Option<String>,

    /// Pipeline name of ZenHub
    #[arg(short, long, global = true)]
    pipeline: Option<String>,

    /// Show progress while working
    #[arg(long, global = true)]
    verbose: bool,

    /// Token file (defaults to ~/.config/peekabow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Issue lookups allowed in flight at once
    #[arg(long, global = true, default_value = "1")]
    concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show your repo's pipeline issue summary
    #[command(visible_alias = "i")]
    Issues,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let ansi = std::io::stdout().is_terminal();
    log_subscriber(args.verbose, ansi, std::io::stdout)?.try_init()?;

    // Load environment variables
    dotenvy::dotenv().ok();

    match args.command {
        Command::Issues => show_issues(&args).await,
    }
}

async fn show_issues(args: &Args) -> anyhow::Result<()> {
    tracing::info!("👀  Load global flags...");
    let Some(request) = summary_request(args) else {
        println!("❌  Please set --owner, --repo, and --pipeline. See help.");
        return Ok(());
    };

    tracing::info!("📄  Load token settings from toml...");
    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(Error::MissingToken { path }) => {
            println!(
                "❌  Please set your token in {}. Just like below:\n{}",
                path.display(),
                CONFIG_EXAMPLE
            );
            return Ok(());
        }
        Err(e) => return Err(anyhow::Error::new(e).context("Failed to load token settings")),
    };

    let github = GitHubClient::with_url(&config.github_token, &config.github_url)?;
    let zenhub = ZenHubClient::with_url(&config.zenhub_token, &config.zenhub_url)?;
    let pipeline_config = PipelineConfig {
        concurrency: args.concurrency,
        show_progress: args.verbose,
    };
    let pipeline = SummaryPipeline::new(github, zenhub, pipeline_config);

    let outcome = match pipeline.summarize(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let kind = e.kind();
            let context = format!("Failed to summarize issues ({})", kind);
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    match outcome {
        SummaryOutcome::Report(summary) => {
            println!(
                "🔽  {}: {}'s issues here:",
                request.repository, request.pipeline
            );
            println!("{}", summary);
        }
        SummaryOutcome::PipelineNotFound(name) => {
            println!("❌  Not Found: {}", name);
            println!("❌  Please check whether if your ZenHub pipeline's name is correct.");
        }
    }

    Ok(())
}

/// Progress lines are printed bare: no level, target or timestamp.
fn log_subscriber<W>(
    verbose: bool,
    ansi: bool,
    writer: W,
) -> anyhow::Result<impl tracing::Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let level = if verbose { "peekabow=info" } else { "peekabow=warn" };
    Ok(tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(writer)
        .with_ansi(ansi)
        .with_level(false)
        .with_target(false)
        .without_time()
        .finish())
}

fn summary_request(args: &Args) -> Option<SummaryRequest> {
    let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    Some(SummaryRequest {
        repository: RepositoryRef::new(present(&args.owner)?, present(&args.repo)?),
        pipeline: present(&args.pipeline)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_verbose_lines_are_plain_when_piped() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = log_subscriber(true, false, move || writer.clone()).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("👀  Load global flags...");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("👀  Load global flags..."));
        assert!(!output.contains("INFO"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_parse_alias_and_global_flags() {
        let args = Args::try_parse_from([
            "peekabow", "i", "-o", "acme", "-r", "widget", "-p", "In Progress", "--verbose",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Issues));
        assert!(args.verbose);
        assert_eq!(args.concurrency, 1);

        let request = summary_request(&args).unwrap();
        assert_eq!(request.repository, RepositoryRef::new("acme", "widget"));
        assert_eq!(request.pipeline, "In Progress");
    }

    #[test]
    fn test_missing_or_empty_flags() {
        let args = Args::try_parse_from(["peekabow", "--owner", "acme", "issues"]).unwrap();
        assert!(summary_request(&args).is_none());

        let args = Args::try_parse_from(["peekabow", "issues", "-o", "acme", "-r", "", "-p", "x"])
            .unwrap();
        assert!(summary_request(&args).is_none());
    }
}
