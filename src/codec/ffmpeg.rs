//! Codec backend driving the `ffmpeg` and `ffprobe` executables.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::ffmpeg_helpers::{
    decode_args, encode_args, parse_probe_output, pcm_from_f32le, probe_args, resolve_program,
    silence_args, stderr_summary,
};
use super::{Codec, PcmBuffer, ProbeInfo};
use crate::config::PipelineConfig;
use crate::error::AudioError;
use crate::transcoder::TranscodePlan;
use crate::util::timeout::with_timeout;

/// ffmpeg-backed [`Codec`].
///
/// Executables are resolved once, up front; nothing is searched at call time.
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    timeout: Duration,
}

impl FfmpegCodec {
    /// Resolve both executables, failing fast with
    /// [`AudioError::DependencyMissing`] when either cannot be found.
    pub fn resolve(
        ffmpeg: impl AsRef<Path>,
        ffprobe: impl AsRef<Path>,
        timeout: Duration,
    ) -> Result<Self, AudioError> {
        let path_var = std::env::var_os("PATH");
        let ffmpeg = resolve_program(ffmpeg.as_ref(), path_var.as_deref())?;
        let ffprobe = resolve_program(ffprobe.as_ref(), path_var.as_deref())?;
        tracing::debug!(
            ffmpeg = %ffmpeg.display(),
            ffprobe = %ffprobe.display(),
            "resolved codec executables"
        );
        Ok(Self {
            ffmpeg,
            ffprobe,
            timeout,
        })
    }

    /// Resolve the executables named in `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, AudioError> {
        Self::resolve(&config.ffmpeg, &config.ffprobe, config.codec_timeout())
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }

    /// Write `seconds` of mono digital silence at `sample_rate`, encoded
    /// according to `plan`.
    ///
    /// Used by the self-check to exercise the encoder without fixture files.
    pub async fn synthesize_silence(
        &self,
        output: &Path,
        seconds: f64,
        sample_rate: u32,
        plan: &TranscodePlan,
    ) -> Result<(), AudioError> {
        let args = silence_args(output, seconds, sample_rate, plan);
        let output_data = self.run(&self.ffmpeg, args).await?;
        if !output_data.status.success() {
            return Err(AudioError::encode(format!(
                "ffmpeg could not synthesize silence: {}",
                stderr_summary(&output_data.stderr)
            )));
        }
        Ok(())
    }

    async fn run(&self, program: &Path, args: Vec<OsString>) -> Result<Output, AudioError> {
        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let program_name = program.display().to_string();
        with_timeout(self.timeout, async move {
            command.output().await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AudioError::DependencyMissing {
                        program: program_name,
                    }
                } else {
                    AudioError::processing_with(format!("failed to run {program_name}"), e)
                }
            })
        })
        .await
    }
}

#[async_trait]
impl Codec for FfmpegCodec {
    async fn probe(&self, path: &Path) -> Result<ProbeInfo, AudioError> {
        let output = self.run(&self.ffprobe, probe_args(path)).await?;
        if !output.status.success() {
            return Err(AudioError::decode(stderr_summary(&output.stderr)));
        }
        parse_probe_output(&output.stdout)
    }

    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &TranscodePlan,
    ) -> Result<(), AudioError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            trim_to = ?plan.trim_to,
            resample_to = ?plan.resample_to,
            channels = ?plan.channels,
            "encoding with ffmpeg"
        );
        let result = self.run(&self.ffmpeg, encode_args(input, output, plan)).await?;
        if !result.status.success() {
            return Err(AudioError::encode(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr_summary(&result.stderr)
            )));
        }
        Ok(())
    }

    async fn decode_mono(&self, path: &Path, sample_rate: u32) -> Result<PcmBuffer, AudioError> {
        let output = self.run(&self.ffmpeg, decode_args(path, sample_rate)).await?;
        if !output.status.success() {
            return Err(AudioError::decode(stderr_summary(&output.stderr)));
        }
        Ok(PcmBuffer::new(pcm_from_f32le(&output.stdout), sample_rate))
    }
}
