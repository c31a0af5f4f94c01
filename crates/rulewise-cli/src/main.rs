mod analyze;
mod build;
mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rulewise_ai::{OpenAiConfig, OpenAiGenerator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rulewise",
    version,
    about = "Turn free-form instruction documents into structured and normalised rules"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and render rules for every document under the input root
    Build(BuildArgs),
    /// Compare document sizes against their generated prose
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Directory of source documents
    #[arg(long, value_name = "DIR", default_value = "fixtures")]
    input: PathBuf,

    /// Directory for generated artifacts
    #[arg(long, value_name = "DIR", default_value = "dist")]
    output: PathBuf,

    /// Model name (overrides RULEWISE_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// API base URL (overrides OPENAI_BASE_URL)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Sampling seed passed to the backend
    #[arg(long, env = "RULEWISE_SEED")]
    seed: Option<i64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Directory of source documents
    #[arg(long, value_name = "DIR", default_value = "fixtures")]
    input: PathBuf,

    /// Directory holding generated artifacts
    #[arg(long, value_name = "DIR", default_value = "dist")]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("rulewise v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Build(args) => cmd_build(args).await,
        Command::Analyze(args) => cmd_analyze(args).await,
    }
}

async fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let mut config = OpenAiConfig::from_env().context("loading backend configuration")?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.seed = args.seed.or(config.seed);
    tracing::info!(model = %config.model, base_url = %config.base_url, "backend configured");

    let generator = OpenAiGenerator::new(config).context("creating backend client")?;
    build::run_build(generator, &args.input, &args.output).await?;
    Ok(())
}

async fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let rows = analyze::compare_dirs(&args.input, &args.output).await?;
    print!("{}", display::size_report(&rows));
    Ok(())
}
