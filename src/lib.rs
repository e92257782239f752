//! clipwave: short audio clip ingestion.
//!
//! Validates uploaded clips, head-trims them to a maximum duration, re-encodes
//! them to a single web-friendly format and summarizes their loudness into a
//! fixed-length waveform for display.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use clipwave::prelude::*;
//!
//! # async fn example() -> clipwave::error::Result<()> {
//! let pipeline = AudioPipeline::with_ffmpeg(PipelineConfig::default())?;
//! let asset = pipeline
//!     .process(Path::new("/tmp/upload.bin"), "demo.wav", Path::new("media"), "demo")
//!     .await?;
//! println!("{} seconds, waveform {:?}", asset.duration, asset.waveform);
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod codec;
pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod prelude;
pub mod transcoder;
pub mod types;
pub mod util;
pub mod validator;
pub mod waveform;

#[cfg(feature = "cli")]
pub mod cli;
