//! Shared test helpers and a recording codec.
//!
//! `RecordingCodec` treats a file containing a JSON `ProbeInfo` as a valid
//! clip; anything else fails to decode. Encoding writes the probe of the
//! planned output, so encoded files validate like real ones. Like LAME, the
//! mp3 encoder folds anything wider than stereo down to two channels.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use clipwave::codec::{Codec, PcmBuffer, ProbeInfo};
use clipwave::error::AudioError;
use clipwave::transcoder::TranscodePlan;
use clipwave::types::AudioFormat;

#[derive(Default)]
pub struct RecordingCodec {
    pub samples: Vec<f32>,
    pub fail_encode: bool,
    pub fail_decode: bool,
    pub unreadable_output: bool,
    probe_calls: AtomicUsize,
    encode_calls: AtomicUsize,
    decode_calls: AtomicUsize,
}

impl RecordingCodec {
    /// A codec whose decoded PCM is a rising ramp, so waveforms are not flat.
    pub fn new() -> Self {
        Self {
            samples: (0..4_410).map(|i| (i as f32 / 4_410.0) * ((i % 2) as f32 * 2.0 - 1.0)).collect(),
            ..Default::default()
        }
    }

    pub fn with_samples(samples: Vec<f32>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    pub fn failing_encode() -> Self {
        Self {
            fail_encode: true,
            ..Self::new()
        }
    }

    pub fn failing_decode() -> Self {
        Self {
            fail_decode: true,
            ..Self::new()
        }
    }

    /// Encoding "succeeds" but leaves a file no probe can read.
    pub fn unreadable_output() -> Self {
        Self {
            unreadable_output: true,
            ..Self::new()
        }
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn decode_calls(&self) -> usize {
        self.decode_calls.load(Ordering::SeqCst)
    }
}

fn read_probe(path: &Path) -> Result<ProbeInfo, AudioError> {
    let raw = std::fs::read(path)?;
    serde_json::from_slice(&raw).map_err(|e| AudioError::decode_with("not a clip", e))
}

#[async_trait]
impl Codec for RecordingCodec {
    async fn probe(&self, path: &Path) -> Result<ProbeInfo, AudioError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        read_probe(path)
    }

    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        plan: &TranscodePlan,
    ) -> Result<(), AudioError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_encode {
            std::fs::write(output, b"partial")?;
            return Err(AudioError::encode("simulated encoder crash"));
        }
        if self.unreadable_output {
            std::fs::write(output, b"garbage")?;
            return Ok(());
        }
        let source = read_probe(input)?;
        let negotiated = match plan.format {
            AudioFormat::Mp3 => source.channels.min(2),
            _ => source.channels,
        };
        let encoded = ProbeInfo {
            duration: plan.output_duration(source.duration),
            sample_rate: plan.resample_to.unwrap_or(source.sample_rate),
            channels: plan.channels.unwrap_or(negotiated),
            bit_rate: Some(128_000),
        };
        std::fs::write(output, serde_json::to_vec(&encoded).unwrap())?;
        Ok(())
    }

    async fn decode_mono(&self, _path: &Path, sample_rate: u32) -> Result<PcmBuffer, AudioError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_decode {
            return Err(AudioError::decode("simulated decode failure"));
        }
        Ok(PcmBuffer::new(self.samples.clone(), sample_rate))
    }
}

/// Bytes of a fake clip with the given stream facts.
pub fn clip_bytes(duration: f64, sample_rate: u32, channels: u16) -> Vec<u8> {
    serde_json::to_vec(&ProbeInfo {
        duration,
        sample_rate,
        channels,
        bit_rate: None,
    })
    .unwrap()
}

/// Write a fake clip into `dir`.
pub fn write_clip(dir: &Path, name: &str, duration: f64, sample_rate: u32, channels: u16) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, clip_bytes(duration, sample_rate, channels)).unwrap();
    path
}

pub fn assert_waveform_in_range(waveform: &[f32], points: usize) {
    assert_eq!(waveform.len(), points);
    for value in waveform {
        assert!(
            (0.1..=1.0).contains(value),
            "waveform value {value} outside [0.1, 1.0]"
        );
    }
}
