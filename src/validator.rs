//! Upload validation: extension, size, then a container probe.

use std::path::Path;

use crate::codec::Codec;
use crate::config::PipelineConfig;
use crate::error::{AudioError, Result};
use crate::types::{AudioFormat, AudioInfo};

/// Format of `original_filename`, if the configuration accepts it.
pub fn check_format(original_filename: &str, config: &PipelineConfig) -> Result<AudioFormat> {
    let unsupported = |extension: String| AudioError::Format {
        extension,
        supported: config.supported_list(),
    };
    let format = AudioFormat::from_filename(original_filename).map_err(unsupported)?;
    if !config.is_supported(format) {
        return Err(unsupported(format.extension().to_string()));
    }
    Ok(format)
}

pub fn check_size(size: u64, config: &PipelineConfig) -> Result<()> {
    if size > config.max_file_size {
        return Err(AudioError::Size {
            size,
            max: config.max_file_size,
        });
    }
    Ok(())
}

/// Validate an uploaded file and read its basic stream facts.
///
/// Extension and size are checked before the codec is touched. A clip longer
/// than the maximum duration is accepted; processing will trim it.
pub async fn validate(
    codec: &dyn Codec,
    config: &PipelineConfig,
    path: &Path,
    original_filename: &str,
) -> Result<AudioInfo> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(AudioError::NotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AudioError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let format = check_format(original_filename, config)?;
    check_size(metadata.len(), config)?;

    let probe = codec.probe(path).await?;

    if probe.duration > config.max_duration() {
        tracing::info!(
            duration = probe.duration,
            max = config.max_duration_secs,
            "audio exceeds max duration, will be trimmed"
        );
    }

    Ok(AudioInfo {
        duration: probe.duration,
        sample_rate: probe.sample_rate,
        channels: probe.channels,
        file_size: metadata.len(),
        format,
    })
}
