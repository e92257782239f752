//! Convenience re-exports for common use.

pub use crate::codec::{Codec, FfmpegCodec, PcmBuffer, ProbeInfo};
pub use crate::config::PipelineConfig;
pub use crate::error::{AudioError, Result};
pub use crate::pipeline::AudioPipeline;
pub use crate::transcoder::TranscodePlan;
pub use crate::types::{
    AudioAsset, AudioFormat, AudioInfo, AudioMetadata, IngestedAudio, Privacy, UploadRequest,
};
