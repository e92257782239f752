//! Head-trim, downsample and re-encode to the target format.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::config::PipelineConfig;
use crate::error::{AudioError, Result};
use crate::types::{AudioFormat, AudioInfo};

/// What the encoder will do to one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodePlan {
    /// Keep only the first this-many seconds; `None` keeps everything.
    pub trim_to: Option<f64>,
    /// Downsample to this rate. `None` leaves the rate to the encoder, which
    /// keeps the source rate when it can.
    pub resample_to: Option<u32>,
    /// Force this channel count. `None` lets the encoder pick a layout it supports.
    pub channels: Option<u16>,
    pub bitrate: String,
    pub format: AudioFormat,
}

impl TranscodePlan {
    /// Plan for `source`: trim only when longer than the maximum, resample
    /// only when above the target rate, downmix only when configured.
    pub fn for_source(source: &AudioInfo, config: &PipelineConfig) -> Self {
        let max = config.max_duration();
        Self {
            trim_to: source.exceeds(max).then_some(max),
            resample_to: (source.sample_rate > config.target_sample_rate)
                .then_some(config.target_sample_rate),
            channels: config.downmix_to_mono.then_some(1),
            bitrate: config.target_bitrate.clone(),
            format: config.target_format,
        }
    }

    /// Duration of the encoded output for a source of `source_duration` seconds.
    pub fn output_duration(&self, source_duration: f64) -> f64 {
        match self.trim_to {
            Some(max) => source_duration.min(max),
            None => source_duration,
        }
    }

    pub fn is_trimming(&self) -> bool {
        self.trim_to.is_some()
    }
}

/// A file written by [`transcode`].
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOutput {
    pub path: PathBuf,
    pub filename: String,
    pub duration: f64,
    /// Rate and channel count the encoder actually wrote.
    pub sample_rate: u32,
    pub channels: u16,
    pub trimmed: bool,
    pub original_duration: Option<f64>,
}

/// Encode `input` into `output_dir/<name>.<ext>` according to `plan`.
///
/// The directory is created when missing and an existing file is replaced.
/// The written file is probed so the reported stream facts are the encoder's,
/// not the plan's. Codec failures surface as [`AudioError::Encode`] (timeouts
/// and a missing backend keep their own variants).
pub async fn transcode(
    codec: &dyn Codec,
    input: &Path,
    source: &AudioInfo,
    plan: &TranscodePlan,
    output_dir: &Path,
    name: &str,
) -> Result<TranscodeOutput> {
    tokio::fs::create_dir_all(output_dir).await?;

    let filename = format!("{name}.{}", plan.format.extension());
    let path = output_dir.join(&filename);

    if let Some(max) = plan.trim_to {
        tracing::info!(
            from = source.duration,
            to = max,
            "trimming audio"
        );
    }

    codec
        .encode(input, &path, plan)
        .await
        .map_err(|e| as_encode_error("re-encode failed", e))?;
    let encoded = codec
        .probe(&path)
        .await
        .map_err(|e| as_encode_error("encoder wrote an unreadable file", e))?;

    let trimmed = plan.is_trimming();
    Ok(TranscodeOutput {
        path,
        filename,
        duration: plan.output_duration(source.duration),
        sample_rate: encoded.sample_rate,
        channels: encoded.channels,
        trimmed,
        original_duration: trimmed.then_some(source.duration),
    })
}

fn as_encode_error(context: &str, e: AudioError) -> AudioError {
    match e {
        AudioError::Encode { .. }
        | AudioError::Timeout(_)
        | AudioError::DependencyMissing { .. } => e,
        other => AudioError::encode_with(context.to_string(), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info(duration: f64, sample_rate: u32, channels: u16) -> AudioInfo {
        AudioInfo {
            duration,
            sample_rate,
            channels,
            file_size: 1024,
            format: AudioFormat::Wav,
        }
    }

    #[test]
    fn short_clip_is_not_trimmed() {
        let plan = TranscodePlan::for_source(&info(42.0, 44_100, 2), &PipelineConfig::default());
        assert_eq!(plan.trim_to, None);
        assert_eq!(plan.output_duration(42.0), 42.0);
    }

    #[test]
    fn long_clip_is_head_trimmed_to_max() {
        let plan = TranscodePlan::for_source(&info(95.5, 44_100, 2), &PipelineConfig::default());
        assert_eq!(plan.trim_to, Some(60.0));
        assert_eq!(plan.output_duration(95.5), 60.0);
    }

    #[test]
    fn clip_exactly_at_max_is_kept() {
        let plan = TranscodePlan::for_source(&info(60.0, 44_100, 1), &PipelineConfig::default());
        assert!(!plan.is_trimming());
    }

    #[test]
    fn downsamples_but_never_upsamples() {
        let config = PipelineConfig::default();
        assert_eq!(
            TranscodePlan::for_source(&info(1.0, 96_000, 2), &config).resample_to,
            Some(44_100)
        );
        assert_eq!(
            TranscodePlan::for_source(&info(1.0, 44_100, 2), &config).resample_to,
            None
        );
        assert_eq!(
            TranscodePlan::for_source(&info(1.0, 22_050, 2), &config).resample_to,
            None
        );
    }

    #[test]
    fn multichannel_odd_rate_source_leaves_layout_to_encoder() {
        let plan = TranscodePlan::for_source(&info(30.0, 37_800, 6), &PipelineConfig::default());
        assert_eq!(plan.resample_to, None);
        assert_eq!(plan.channels, None);
        assert_eq!(plan.trim_to, None);
    }

    #[test]
    fn forces_channels_only_when_downmix_enabled() {
        let source = info(1.0, 44_100, 6);
        assert_eq!(
            TranscodePlan::for_source(&source, &PipelineConfig::default()).channels,
            None
        );

        let config = PipelineConfig::builder().downmix_to_mono(true).build();
        assert_eq!(TranscodePlan::for_source(&source, &config).channels, Some(1));
    }

    #[test]
    fn plan_carries_target_format_and_bitrate() {
        let config = PipelineConfig::builder()
            .target_format(AudioFormat::Ogg)
            .target_bitrate("96k")
            .build();
        let plan = TranscodePlan::for_source(&info(1.0, 44_100, 2), &config);
        assert_eq!(plan.format, AudioFormat::Ogg);
        assert_eq!(plan.bitrate, "96k");
    }
}
