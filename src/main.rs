// src/main.rs
mod extractors;
mod pipeline;
mod render;
mod sources;
mod storage;
mod utils;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use pipeline::{Outcome, Pipeline};
use render::annotation::{read_annotations, Annotation, Applicability, Compliance, Defining};
use render::{RenderMode, Renderer};
use sources::client::{HttpFetcher, DEFAULT_ENCODING, DEFAULT_TIMEOUT_SECS};
use storage::{PackMode, StorageManager, DEFAULT_ARCHIVE_NAME};
use utils::AppError;

/// Extract statute articles from government law databases into annotated HTML tables
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Law page URLs (law.moj.gov.tw or law.moea.gov.tw)
    urls: Vec<String>,

    /// File with one URL per line (blank lines ignored)
    #[arg(short = 'f', long)]
    urls_file: Option<PathBuf>,

    /// Output directory for generated documents
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Deliver one zip archive or one file per law
    #[arg(short, long, value_enum, default_value_t = PackMode::Zip)]
    pack: PackMode,

    /// File name of the zip archive in zip mode
    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    archive_name: String,

    /// Render static read-only tables without annotation columns
    #[arg(long)]
    legacy: bool,

    /// Charset used to decode every page, overriding the declared one
    #[arg(long, default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Summarize the review state of an exported document and exit
    #[arg(long, value_name = "FILE")]
    review: Option<PathBuf>,
}

impl Args {
    /// URLs from the positional arguments followed by those in the URL file.
    fn url_list(&self) -> Result<Vec<String>, AppError> {
        let mut input = self.urls.join("\n");
        if let Some(path) = &self.urls_file {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| AppError::Config(format!("Cannot read URL file {}: {}", path.display(), e)))?;
            input.push('\n');
            input.push_str(&contents);
        }
        Ok(pipeline::parse_url_list(&input))
    }

    fn render_mode(&self) -> RenderMode {
        if self.legacy { RenderMode::Legacy } else { RenderMode::Annotated }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    // 3. Review mode works on an existing file and needs no network
    if let Some(path) = &args.review {
        return review_document(path);
    }

    let urls = args.url_list()?;
    if urls.is_empty() {
        return Err(AppError::Config("No URLs given; pass them as arguments or with --urls-file".to_string()));
    }
    tracing::info!("Processing {} URLs", urls.len());

    // 4. Fetch and extract, one URL at a time
    let fetcher = HttpFetcher::new(&args.encoding, Duration::from_secs(args.timeout_secs))?;
    let outcomes = Pipeline::new(fetcher).run(&urls).await;

    // 5. Render every successful extraction
    let renderer = Renderer::new(args.render_mode());
    let documents: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match &o.outcome {
            Outcome::Success(result) => Some(renderer.render(result)),
            Outcome::Failure(_) => None,
        })
        .collect();

    // 6. Deliver
    let storage = StorageManager::new(&args.output_dir)?;
    if !documents.is_empty() {
        let paths = storage.deliver(&documents, args.pack, &args.archive_name)?;
        tracing::info!("Delivered {} documents in {} file(s)", documents.len(), paths.len());
    }
    storage.save_manifest(&outcomes)?;

    let success_count = documents.len();
    let failure_count = outcomes.len() - success_count;
    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 {
        return Err(AppError::Processing(format!("Failed to extract any of the {} URLs", failure_count)));
    }

    Ok(())
}

/// Logs the frozen annotations of an exported document.
fn review_document(path: &Path) -> Result<(), AppError> {
    let html = std::fs::read_to_string(path)?;
    let reviewed = read_annotations(&html);

    if reviewed.articles.is_empty() {
        return Err(AppError::Processing(format!("No article rows found in {}", path.display())));
    }

    tracing::info!("Review of '{}' ({} articles)", reviewed.title, reviewed.articles.len());
    for article in &reviewed.articles {
        let a = &article.annotation;
        tracing::info!(
            "{}: 定義條文={} 是否適用={} 是否符合={} 備註={:?}",
            article.number,
            a.defining.as_str(),
            a.applicability.as_str(),
            a.compliance.as_str(),
            a.remarks
        );
    }

    let count = |pred: fn(&Annotation) -> bool| {
        reviewed.articles.iter().filter(|art| pred(&art.annotation)).count()
    };
    tracing::info!(
        "Defining: {}, applicable: {}, not applicable: {}, compliant: {}, non-compliant: {}, unreviewed: {}",
        count(|a| a.defining == Defining::Yes),
        count(|a| a.applicability == Applicability::Applicable),
        count(|a| a.applicability == Applicability::NotApplicable),
        count(|a| a.compliance == Compliance::Compliant),
        count(|a| a.compliance == Compliance::NonCompliant),
        count(|a| a.applicability == Applicability::Unset && a.compliance == Compliance::Unset),
    );

    Ok(())
}
