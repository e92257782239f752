//! The ingestion pipeline: `received → validated → transcoded → summarized → returned`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::cleanup::cleanup_temp_files_async;
use crate::codec::{Codec, FfmpegCodec};
use crate::config::PipelineConfig;
use crate::error::{AudioError, Result};
use crate::transcoder::{transcode, TranscodePlan};
use crate::types::{AudioAsset, AudioFormat, AudioInfo, AudioMetadata, IngestedAudio, UploadRequest};
use crate::validator::{check_size, validate};
use crate::waveform::{fallback, summarize_or_fallback};

/// Stateless, request-scoped audio ingestion.
///
/// Cheap to clone; every call is independent, so one instance can serve
/// concurrent uploads.
#[derive(Clone)]
pub struct AudioPipeline {
    config: Arc<PipelineConfig>,
    codec: Arc<dyn Codec>,
}

impl std::fmt::Debug for AudioPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPipeline")
            .field("config", &self.config)
            .field("codec", &"..")
            .finish()
    }
}

impl AudioPipeline {
    /// Build a pipeline around an explicit codec backend.
    pub fn new(config: PipelineConfig, codec: Arc<dyn Codec>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            codec,
        })
    }

    /// Build a pipeline backed by the ffmpeg executables named in `config`.
    pub fn with_ffmpeg(config: PipelineConfig) -> Result<Self> {
        let codec = FfmpegCodec::from_config(&config)?;
        Self::new(config, Arc::new(codec))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Validate an already-persisted upload.
    pub async fn validate(&self, path: &Path, original_filename: &str) -> Result<AudioInfo> {
        validate(self.codec.as_ref(), &self.config, path, original_filename).await
    }

    /// Validate, trim, re-encode and summarize one file.
    ///
    /// Writes exactly one file, `output_dir/<target_name>.<ext>`. If encoding
    /// fails any partial output is removed. Waveform failures never fail the
    /// call.
    pub async fn process(
        &self,
        input: &Path,
        original_filename: &str,
        output_dir: &Path,
        target_name: &str,
    ) -> Result<AudioAsset> {
        let info = self.validate(input, original_filename).await?;
        tracing::debug!(
            input = %input.display(),
            duration = info.duration,
            sample_rate = info.sample_rate,
            channels = info.channels,
            "validated upload"
        );

        let plan = TranscodePlan::for_source(&info, &self.config);
        let output = match transcode(
            self.codec.as_ref(),
            input,
            &info,
            &plan,
            output_dir,
            target_name,
        )
        .await
        {
            Ok(output) => output,
            Err(e) => {
                let partial = output_dir.join(format!("{target_name}.{}", plan.format.extension()));
                cleanup_temp_files_async([&partial]).await;
                return Err(e);
            }
        };

        let waveform = self
            .waveform_for(&output.path, output.sample_rate, self.config.waveform_points)
            .await;

        let file_size = match tokio::fs::metadata(&output.path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                cleanup_temp_files_async([&output.path]).await;
                return Err(AudioError::processing_with(
                    "encoder produced no output file",
                    e,
                ));
            }
        };

        tracing::info!(
            path = %output.path.display(),
            duration = output.duration,
            trimmed = output.trimmed,
            file_size,
            "processed audio"
        );

        Ok(AudioAsset {
            processed_path: output.path,
            filename: output.filename,
            duration: output.duration,
            sample_rate: output.sample_rate,
            channels: output.channels,
            file_size,
            format: plan.format,
            bitrate: plan.bitrate,
            waveform,
            trimmed: output.trimmed,
            original_duration: output.original_duration,
        })
    }

    /// Persist an upload to the temp dir, process it under a unique name and
    /// remove the temp copy whatever the outcome.
    pub async fn ingest(
        &self,
        user_id: &str,
        request: UploadRequest,
        output_dir: &Path,
    ) -> Result<IngestedAudio> {
        check_size(request.bytes.len() as u64, &self.config)?;

        let temp_path = self.stage_upload(&request).await?;
        let stem = self.config.unique_name(user_id, &request.filename);
        tracing::debug!(user_id, stem = %stem, "ingesting upload");

        let result = self
            .process(&temp_path, &request.filename, output_dir, &stem)
            .await;
        cleanup_temp_files_async([&temp_path]).await;

        let asset = result?;
        Ok(IngestedAudio {
            stem,
            title: request.title,
            artist: request.artist,
            privacy: request.privacy,
            asset,
        })
    }

    /// Best-effort `points`-value waveform of any readable file; never fails.
    pub async fn generate_waveform(&self, path: &Path, points: usize) -> Vec<f32> {
        let sample_rate = match self.codec.probe(path).await {
            Ok(probe) => probe.sample_rate.min(self.config.target_sample_rate),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error generating waveform");
                return fallback(points);
            }
        };
        self.waveform_for(path, sample_rate, points).await
    }

    /// Best-effort metadata of any file; `None` (and a logged error) when unreadable.
    pub async fn extract_metadata(&self, path: &Path) -> Option<AudioMetadata> {
        let file_size = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error extracting metadata");
                return None;
            }
        };
        match self.codec.probe(path).await {
            Ok(probe) => Some(AudioMetadata {
                duration: probe.duration,
                sample_rate: probe.sample_rate,
                channels: probe.channels,
                file_size,
                bitrate: probe.bit_rate,
                format: path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| AudioFormat::from_filename(name).ok()),
            }),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error extracting metadata");
                None
            }
        }
    }

    async fn waveform_for(&self, path: &Path, sample_rate: u32, points: usize) -> Vec<f32> {
        match self.codec.decode_mono(path, sample_rate).await {
            Ok(pcm) => summarize_or_fallback(&pcm.samples, points),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error generating waveform");
                fallback(points)
            }
        }
    }

    async fn stage_upload(&self, request: &UploadRequest) -> Result<PathBuf> {
        let temp_dir = self.config.temp_dir();
        tokio::fs::create_dir_all(&temp_dir).await?;

        let extension = Path::new(&request.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        let path = temp_dir.join(format!(
            "clipwave-upload-{}{extension}",
            Uuid::new_v4().simple()
        ));

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        let written: std::io::Result<()> = async {
            file.write_all(&request.bytes).await?;
            file.flush().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            cleanup_temp_files_async([&path]).await;
            return Err(e.into());
        }
        Ok(path)
    }
}
