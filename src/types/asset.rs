//! Results produced by validation and processing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::format::AudioFormat;

/// Basic facts about an accepted upload, returned by validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioInfo {
    /// Duration in seconds.
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Size on disk in bytes.
    pub file_size: u64,
    pub format: AudioFormat,
}

impl AudioInfo {
    /// Whether processing will head-trim this file.
    pub fn exceeds(&self, max_duration_secs: f64) -> bool {
        self.duration > max_duration_secs
    }
}

/// A processed clip, ready to be stored and served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioAsset {
    pub processed_path: PathBuf,
    /// File name of `processed_path`, `<stem>.<ext>`.
    pub filename: String,
    /// Duration in seconds after trimming.
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub file_size: u64,
    pub format: AudioFormat,
    /// Encoder bitrate tag, e.g. `128k`.
    pub bitrate: String,
    /// Normalized RMS amplitudes in `[0.1, 1.0]`.
    pub waveform: Vec<f32>,
    pub trimmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_duration: Option<f64>,
}

/// Best-effort description of an arbitrary audio file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioMetadata {
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub file_size: u64,
    /// Bits per second as reported by the container, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AudioFormat>,
}
