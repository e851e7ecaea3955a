//! `precis`: summarize a PDF at one or all compression ratios.
//!
//! ```bash
//! precis "path/to/bill.pdf" --ratio 20
//! precis "path/to/bill.pdf" --ratio all --output-dir summaries/
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use precis::{
    Config, OpenRouterClient, PdfExtractor, PdfRenderer, Pipeline, RatioSelector, TemplateStore,
};

/// Summarize lengthy legislative and political PDF documents.
#[derive(Parser, Debug)]
#[command(name = "precis", version, about)]
struct Cli {
    /// Path to the PDF file.
    pdf_path: PathBuf,

    /// Summary ratio (1:N), or `all` to produce every ratio.
    #[arg(long, value_parser = ["5", "10", "20", "50", "100", "all"])]
    ratio: String,

    /// Directory holding the per-ratio prompt templates.
    #[arg(long, env = "PROMPTS_DIR", default_value = "prompts")]
    prompts_dir: PathBuf,

    /// Directory the summary PDF is written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Hide the progress bar.
    #[arg(long)]
    no_progress: bool,
}

async fn run(cli: Cli) -> anyhow::Result<PathBuf> {
    let selector: RatioSelector = cli.ratio.parse()?;

    if !cli.pdf_path.is_file() {
        anyhow::bail!("the file '{}' was not found", cli.pdf_path.display());
    }

    let config = Config::from_env().context("please set it in the environment or a .env file")?;
    config.log_summary();

    let templates = TemplateStore::new(&cli.prompts_dir)
        .resolve(selector)
        .context("prompt templates are incomplete")?;

    let llm = OpenRouterClient::new(&config)?;
    let pipeline = Pipeline::new(&config, &templates, &PdfExtractor, &llm, &PdfRenderer)
        .with_progress(!cli.no_progress);

    let output = pipeline
        .run(&cli.pdf_path, selector, &cli.output_dir)
        .await
        .with_context(|| format!("summarizing '{}' failed", cli.pdf_path.display()))?;
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            info!(output = %output.display(), "pipeline finished successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
