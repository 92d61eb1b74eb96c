use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use queryosity::config::{find_config_file, load_config};
use queryosity::llm::GeminiClient;
use queryosity::models::{SearchQuery, SortBy, DEFAULT_MAX_RESULTS};
use queryosity::sources::{GeminiScholarSource, Source};
use queryosity::ui::{self, Status};
use queryosity::utils::{
    render, sanitize_query, validate_max_results, write_output, OutputFormat,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Queryosity - Search academic research using a Gemini-backed Google Scholar emulation
#[derive(Parser, Debug)]
#[command(name = "queryosity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search academic research using Gemini / Google Scholar emulation", long_about = None)]
struct Cli {
    /// Query string or question
    #[arg(long, required_unless_present_any = ["input_file", "env"], conflicts_with = "input_file")]
    query: Option<String>,

    /// File containing query text
    #[arg(long, value_name = "PATH")]
    input_file: Option<PathBuf>,

    /// Number of results to retrieve
    #[arg(long, short = 'n', default_value_t = DEFAULT_MAX_RESULTS)]
    results: usize,

    /// Sort order for output
    #[arg(long, short, value_enum, default_value_t = SortArg::Relevance)]
    sort: SortArg,

    /// Output filename (format chosen by extension: .md, .json, .csv)
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format, overriding the output file extension
    #[arg(long, short, value_enum)]
    format: Option<FormatArg>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,
}

/// Sort order for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortArg {
    /// Highest relevance first
    Relevance,
    /// Order returned by the model
    Retrieved,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortBy::Relevance,
            SortArg::Retrieved => SortBy::Retrieved,
        }
    }
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Markdown,
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

impl Cli {
    /// Format from `--format`, else the output extension, else Markdown
    fn output_format(&self) -> OutputFormat {
        self.format
            .map(OutputFormat::from)
            .or_else(|| self.output.as_deref().map(OutputFormat::from_path))
            .unwrap_or_default()
    }

    /// Query text from `--query` or `--input-file`, trimmed and validated
    fn query_text(&self) -> Result<String> {
        let raw = match (&self.query, &self.input_file) {
            (Some(query), _) => query.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read query file {}", path.display()))?,
            (None, None) => anyhow::bail!("Either --query or --input-file is required"),
        };

        Ok(sanitize_query(&raw)?)
    }
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Queryosity - Environment Variables");
    println!();
    println!("Model Service:");
    println!("  GEMINI_PROJECT_ID           Google Cloud project hosting Vertex AI (required)");
    println!("  GEMINI_LOCATION             Vertex AI region (default: us-central1)");
    println!("  GEMINI_MODEL                Gemini model id (default: gemini-2.5-pro)");
    println!("  GOOGLE_ACCESS_TOKEN         OAuth token (default: gcloud auth print-access-token)");
    println!();
    println!("Structured Overrides:");
    println!("  QUERYOSITY__GEMINI__TEMPERATURE   Sampling temperature (default: 0.7)");
    println!("  QUERYOSITY__GEMINI__TIMEOUT_SECS  Request timeout in seconds (default: 120)");
    println!("  QUERYOSITY__GEMINI__ENDPOINT      Base URL override for the Vertex AI endpoint");
    println!("  QUERYOSITY__OUTPUT__DISCLAIMER    Print the model-inferred note (default: true)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Variables may also be placed in a .env file in the working directory.");
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("queryosity={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose, cli.quiet);

    // Input is validated before any configuration or network access
    let query_text = cli.query_text()?;
    let max_results = validate_max_results(cli.results)?;

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let config = load_config(config_path.as_deref())?;
    config.validate()?;

    let timeout = cli.timeout.map(Duration::from_secs);
    let client = GeminiClient::from_config(&config.gemini, timeout)?;
    let source = GeminiScholarSource::new(Arc::new(client)).temperature(config.gemini.temperature);

    let search_query = SearchQuery::new(query_text)
        .max_results(max_results)
        .sort_by(cli.sort.into());

    let spinner = ui::spinner(
        &format!("Searching with {}...", config.gemini.model),
        !cli.quiet,
    );
    let result = source.search(&search_query).await;
    spinner.finish_and_clear();
    let response = result.context("Search failed")?;

    if !cli.quiet {
        ui::print_issue_summary(&response.issues);
    }

    let papers = response.into_sorted(search_query.sort_by);
    let format = cli.output_format();

    match &cli.output {
        Some(path) => {
            write_output(&papers, path, format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !cli.quiet {
                ui::print_status(Status::Success, &format!("Saved to {}", path.display()));
            }
        }
        None => {
            println!("{}", render(&papers, format)?);
            if format == OutputFormat::Markdown && config.output.disclaimer {
                println!("\n{}\n", ui::DISCLAIMER);
            }
        }
    }

    Ok(())
}
