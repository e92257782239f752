//! CLI command handlers.

use std::path::Path;

use serde::Serialize;

use super::{IngestArgs, ProcessArgs, ValidateArgs, WaveformArgs};
use crate::codec::{Codec, FfmpegCodec};
use crate::config::PipelineConfig;
use crate::error::AudioError;
use crate::pipeline::AudioPipeline;
use crate::transcoder::TranscodePlan;
use crate::types::{AudioInfo, UploadRequest};
use crate::waveform::summarize_or_fallback;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn declared_name(file: &Path, name: Option<String>) -> String {
    name.unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Handle `clipwave validate`.
pub async fn handle_validate(pipeline: &AudioPipeline, args: ValidateArgs) -> CliResult {
    let name = declared_name(&args.file, args.name);
    let info = pipeline.validate(&args.file, &name).await?;
    print_json(&info)
}

/// Handle `clipwave process`.
pub async fn handle_process(pipeline: &AudioPipeline, args: ProcessArgs) -> CliResult {
    let name = declared_name(&args.file, args.name);
    let stem = pipeline.config().unique_name(&args.user, &name);
    let asset = pipeline.process(&args.file, &name, &args.out, &stem).await?;
    print_json(&asset)
}

/// Handle `clipwave ingest`.
pub async fn handle_ingest(pipeline: &AudioPipeline, args: IngestArgs) -> CliResult {
    let bytes = tokio::fs::read(&args.file).await?;
    let request = UploadRequest::builder()
        .bytes(bytes)
        .filename(declared_name(&args.file, None))
        .maybe_title(args.title)
        .maybe_artist(args.artist)
        .privacy(args.privacy)
        .build();
    let ingested = pipeline.ingest(&args.user, request, &args.out).await?;
    print_json(&ingested)
}

/// Handle `clipwave waveform`.
pub async fn handle_waveform(pipeline: &AudioPipeline, args: WaveformArgs) -> CliResult {
    let points = args.points.unwrap_or(pipeline.config().waveform_points);
    if points == 0 {
        return Err("--points must be greater than zero".into());
    }
    let waveform = pipeline.generate_waveform(&args.file, points).await;
    print_json(&waveform)
}

/// Handle `clipwave metadata`.
pub async fn handle_metadata(pipeline: &AudioPipeline, file: &Path) -> CliResult {
    match pipeline.extract_metadata(file).await {
        Some(metadata) => print_json(&metadata),
        None => Err(format!("could not read metadata from {}", file.display()).into()),
    }
}

/// Handle `clipwave check`: encode a second of silence, then validate and
/// summarize it.
pub async fn handle_check(config: &PipelineConfig) -> CliResult {
    let codec = FfmpegCodec::from_config(config)?;
    println!("ffmpeg:  {}", codec.ffmpeg_path().display());
    println!("ffprobe: {}", codec.ffprobe_path().display());

    let dir = tempfile::TempDir::new_in(config.temp_dir())?;
    let filename = format!("check.{}", config.target_format.extension());
    let path = dir.path().join(&filename);

    let source = AudioInfo {
        duration: 1.0,
        sample_rate: config.target_sample_rate,
        channels: 1,
        file_size: 0,
        format: config.target_format,
    };
    let plan = TranscodePlan::for_source(&source, config);
    codec
        .synthesize_silence(&path, 1.0, config.target_sample_rate, &plan)
        .await?;

    let info = crate::validator::validate(&codec, config, &path, &filename).await?;
    if info.format != config.target_format {
        return Err(AudioError::processing(format!(
            "expected {}, validated as {}",
            config.target_format, info.format
        ))
        .into());
    }
    println!(
        "✅ Audio validation works: {:.2}s, {} Hz, {} channel(s)",
        info.duration, info.sample_rate, info.channels
    );

    let pcm = codec.decode_mono(&path, info.sample_rate).await?;
    let waveform = summarize_or_fallback(&pcm.samples, config.waveform_points);
    println!("✅ Waveform generation works: {} points", waveform.len());
    Ok(())
}
