//! Coarse RMS waveform summaries for visual display.
//!
//! The summary is best effort: [`summarize_or_fallback`] never fails and always
//! returns exactly the requested number of points. Callers that need to know
//! *why* a summary could not be computed use [`try_summarize`].

use thiserror::Error;

pub const DEFAULT_POINTS: usize = 20;

/// Returned in place of a real summary when computation fails.
pub const FALLBACK_WAVEFORM: [f32; 20] = [
    0.3, 0.7, 0.5, 0.8, 0.4, 0.9, 0.6, 0.7, 0.5, 0.8, 0.3, 0.6, 0.9, 0.4, 0.7, 0.5, 0.8, 0.6,
    0.4, 0.7,
];

const FLOOR: f64 = 0.1;
const FLAT: f32 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum WaveformError {
    #[error("point count must be greater than zero")]
    ZeroPoints,
    #[error("non-finite sample at index {0}")]
    NonFiniteSample(usize),
}

/// Summarize `samples` into `points` values in `[0.1, 1.0]`.
///
/// The buffer is split into `points` contiguous segments whose lengths differ
/// by at most one sample. Each segment's RMS is min-max normalized so the
/// quietest maps to 0.1 and the loudest to 1.0; equal segments all map to 0.5.
/// Buffers shorter than `points` yield one value per sample and repeat the last
/// value to fill the tail. An empty buffer is flat.
pub fn try_summarize(samples: &[f32], points: usize) -> Result<Vec<f32>, WaveformError> {
    if points == 0 {
        return Err(WaveformError::ZeroPoints);
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(WaveformError::NonFiniteSample(index));
    }
    if samples.is_empty() {
        return Ok(vec![FLAT; points]);
    }

    let segments = points.min(samples.len());
    let levels: Vec<f64> = (0..segments)
        .map(|i| {
            let start = i * samples.len() / segments;
            let end = (i + 1) * samples.len() / segments;
            rms(&samples[start..end])
        })
        .collect();

    let mut normalized = normalize(&levels);
    let last = normalized.last().copied().unwrap_or(FLAT);
    normalized.resize(points, last);
    Ok(normalized)
}

/// Summarize, substituting the fixed fallback sequence on any failure.
pub fn summarize_or_fallback(samples: &[f32], points: usize) -> Vec<f32> {
    match try_summarize(samples, points) {
        Ok(waveform) => waveform,
        Err(e) => {
            tracing::error!(error = %e, "error generating waveform");
            fallback(points)
        }
    }
}

/// The fallback sequence, cycled or cut to `points` values.
pub fn fallback(points: usize) -> Vec<f32> {
    FALLBACK_WAVEFORM.iter().copied().cycle().take(points).collect()
}

fn rms(segment: &[f32]) -> f64 {
    let sum_sq: f64 = segment.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_sq / segment.len() as f64).sqrt()
}

fn normalize(levels: &[f64]) -> Vec<f32> {
    let min = levels.iter().copied().fold(f64::INFINITY, f64::min);
    let max = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![FLAT; levels.len()];
    }

    levels
        .iter()
        .map(|&level| {
            let scaled = (level - min) / (max - min) * (1.0 - FLOOR) + FLOOR;
            scaled.clamp(FLOOR, 1.0) as f32
        })
        .collect()
}
