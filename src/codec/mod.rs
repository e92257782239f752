//! Audio codec backend: probing, encoding and PCM decoding.

pub mod ffmpeg;
mod ffmpeg_helpers;

pub use ffmpeg::FfmpegCodec;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AudioError;
use crate::transcoder::TranscodePlan;

/// Stream facts read from a container without decoding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Seconds.
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Bits per second, when the container reports it.
    pub bit_rate: Option<u64>,
}

/// Decoded mono PCM samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Trait for audio codec backends.
///
/// Implementations must bound every call in wall-clock time and report a
/// missing backend as [`AudioError::DependencyMissing`].
#[async_trait]
pub trait Codec: Send + Sync {
    /// Read stream parameters; fails with [`AudioError::Decode`] on unreadable input.
    async fn probe(&self, path: &Path) -> Result<ProbeInfo, AudioError>;

    /// Write `output` according to `plan`, overwriting any existing file.
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &TranscodePlan,
    ) -> Result<(), AudioError>;

    /// Decode to mono `f32` samples at `sample_rate`.
    async fn decode_mono(&self, path: &Path, sample_rate: u32) -> Result<PcmBuffer, AudioError>;
}
