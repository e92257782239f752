//! CLI entry point for clipwave.

pub mod commands;
pub mod errors;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::pipeline::AudioPipeline;
use crate::types::Privacy;

/// clipwave audio clip CLI
#[derive(Parser, Debug)]
#[command(name = "clipwave", version, about = "clipwave: short audio clip ingestion")]
pub struct Cli {
    /// Config file (defaults to the per-user config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a file and print its stream facts
    Validate(ValidateArgs),
    /// Trim, re-encode and summarize a file
    Process(ProcessArgs),
    /// Ingest a file as if it were an upload
    Ingest(IngestArgs),
    /// Print the waveform summary of a file
    Waveform(WaveformArgs),
    /// Print best-effort metadata of a file
    Metadata(FileArgs),
    /// Check that the codec executables work
    Check,
}

/// Arguments for `clipwave validate`.
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    pub file: PathBuf,

    /// Declared filename (defaults to the file's own name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for `clipwave process`.
#[derive(Parser, Debug)]
pub struct ProcessArgs {
    pub file: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub out: PathBuf,

    /// Declared filename (defaults to the file's own name)
    #[arg(long)]
    pub name: Option<String>,

    /// User id used to allocate the output name
    #[arg(short, long, default_value = "local")]
    pub user: String,
}

/// Arguments for `clipwave ingest`.
#[derive(Parser, Debug)]
pub struct IngestArgs {
    pub file: PathBuf,

    #[arg(short, long)]
    pub user: String,

    /// Output directory
    #[arg(short, long)]
    pub out: PathBuf,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    /// public, followers or private
    #[arg(long, default_value = "public")]
    pub privacy: Privacy,
}

/// Arguments for `clipwave waveform`.
#[derive(Parser, Debug)]
pub struct WaveformArgs {
    pub file: PathBuf,

    /// Number of points (defaults to the configured count)
    #[arg(short, long)]
    pub points: Option<usize>,
}

/// A single file argument.
#[derive(Parser, Debug)]
pub struct FileArgs {
    pub file: PathBuf,
}

/// Load configuration, build the ffmpeg-backed pipeline and dispatch `cli.command`.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load(cli.config.as_deref())?;
    let pipeline = AudioPipeline::with_ffmpeg(config)?;

    match cli.command {
        Commands::Validate(args) => commands::handle_validate(&pipeline, args).await,
        Commands::Process(args) => commands::handle_process(&pipeline, args).await,
        Commands::Ingest(args) => commands::handle_ingest(&pipeline, args).await,
        Commands::Waveform(args) => commands::handle_waveform(&pipeline, args).await,
        Commands::Metadata(args) => commands::handle_metadata(&pipeline, &args.file).await,
        Commands::Check => commands::handle_check(pipeline.config()).await,
    }
}
