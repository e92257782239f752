//! Pipeline configuration (layered: code defaults > TOML file > env).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{AudioError, Result};
use crate::types::AudioFormat;

pub const DEFAULT_MAX_DURATION_SECS: u32 = 60;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_TARGET_BITRATE: &str = "128k";
pub const DEFAULT_TARGET_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_WAVEFORM_POINTS: usize = 20;
pub const DEFAULT_CODEC_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_FILENAME_PREFIX: &str = "audio";
pub const DEFAULT_STEM_MAX_CHARS: usize = crate::naming::STEM_MAX_CHARS;

const ENV_PREFIX: &str = "CLIPWAVE_";

/// Limits and targets for the ingestion pipeline.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```
/// use clipwave::config::PipelineConfig;
///
/// let config = PipelineConfig::from_toml_str("max_duration_secs = 30").unwrap();
/// assert_eq!(config.max_duration_secs, 30);
/// assert_eq!(config.waveform_points, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Longer clips are head-trimmed to this many seconds.
    #[builder(default = DEFAULT_MAX_DURATION_SECS)]
    pub max_duration_secs: u32,
    /// Uploads above this many bytes are rejected.
    #[builder(default = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,
    #[builder(default = AudioFormat::ALL.to_vec())]
    pub supported_formats: Vec<AudioFormat>,
    #[builder(default = AudioFormat::Mp3)]
    pub target_format: AudioFormat,
    #[builder(into, default = String::from(DEFAULT_TARGET_BITRATE))]
    pub target_bitrate: String,
    /// Sources above this rate are downsampled; lower rates are kept.
    #[builder(default = DEFAULT_TARGET_SAMPLE_RATE)]
    pub target_sample_rate: u32,
    #[builder(default = DEFAULT_WAVEFORM_POINTS)]
    pub waveform_points: usize,
    /// Wall-clock limit for each codec invocation.
    #[builder(default = DEFAULT_CODEC_TIMEOUT_SECS)]
    pub codec_timeout_secs: u64,
    #[builder(into, default = PathBuf::from("ffmpeg"))]
    pub ffmpeg: PathBuf,
    #[builder(into, default = PathBuf::from("ffprobe"))]
    pub ffprobe: PathBuf,
    /// Where uploads are staged; the system temp dir when unset.
    #[builder(into)]
    pub temp_dir: Option<PathBuf>,
    #[builder(default)]
    pub downmix_to_mono: bool,
    #[builder(into, default = String::from(DEFAULT_FILENAME_PREFIX))]
    pub filename_prefix: String,
    /// Characters of the uploaded filename's stem kept in stored names.
    #[builder(default = DEFAULT_STEM_MAX_CHARS)]
    pub stem_max_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PipelineConfig {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| AudioError::Configuration(format!("invalid config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus `CLIPWAVE_*` environment overrides (`.env` is honoured).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load the full layered configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user default file
    /// is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AudioError::Configuration(format!("cannot read {}: {e}", path.display()))
                })?;
                toml::from_str(&raw)
                    .map_err(|e| AudioError::Configuration(format!("invalid config file: {e}")))?
            }
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "loading default config file");
                    let raw = std::fs::read_to_string(&path)?;
                    toml::from_str(&raw).map_err(|e| {
                        AudioError::Configuration(format!("invalid config file: {e}"))
                    })?
                }
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Per-user config file location, e.g. `~/.config/clipwave/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "clipwave")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `CLIPWAVE_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("MAX_DURATION_SECS") {
            self.max_duration_secs = parse_env("MAX_DURATION_SECS", &v)?;
        }
        if let Some(v) = var("MAX_FILE_SIZE") {
            self.max_file_size = parse_env("MAX_FILE_SIZE", &v)?;
        }
        if let Some(v) = var("SUPPORTED_FORMATS") {
            self.supported_formats = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_env("SUPPORTED_FORMATS", s))
                .collect::<Result<Vec<_>>>()?;
        }
        if let Some(v) = var("TARGET_FORMAT") {
            self.target_format = parse_env("TARGET_FORMAT", &v)?;
        }
        if let Some(v) = var("TARGET_BITRATE") {
            self.target_bitrate = v;
        }
        if let Some(v) = var("TARGET_SAMPLE_RATE") {
            self.target_sample_rate = parse_env("TARGET_SAMPLE_RATE", &v)?;
        }
        if let Some(v) = var("WAVEFORM_POINTS") {
            self.waveform_points = parse_env("WAVEFORM_POINTS", &v)?;
        }
        if let Some(v) = var("CODEC_TIMEOUT_SECS") {
            self.codec_timeout_secs = parse_env("CODEC_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = var("FFMPEG") {
            self.ffmpeg = PathBuf::from(v);
        }
        if let Some(v) = var("FFPROBE") {
            self.ffprobe = PathBuf::from(v);
        }
        if let Some(v) = var("TEMP_DIR") {
            self.temp_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = var("DOWNMIX_TO_MONO") {
            self.downmix_to_mono = parse_env("DOWNMIX_TO_MONO", &v)?;
        }
        if let Some(v) = var("FILENAME_PREFIX") {
            self.filename_prefix = v;
        }
        if let Some(v) = var("STEM_MAX_CHARS") {
            self.stem_max_chars = parse_env("STEM_MAX_CHARS", &v)?;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_duration_secs == 0 {
            return Err(AudioError::Configuration(
                "max_duration_secs must be greater than zero".into(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(AudioError::Configuration(
                "max_file_size must be greater than zero".into(),
            ));
        }
        if self.supported_formats.is_empty() {
            return Err(AudioError::Configuration(
                "supported_formats must not be empty".into(),
            ));
        }
        if self.target_format.is_lossy() && self.target_bitrate.trim().is_empty() {
            return Err(AudioError::Configuration(
                "target_bitrate must not be empty".into(),
            ));
        }
        if self.target_sample_rate == 0 {
            return Err(AudioError::Configuration(
                "target_sample_rate must be greater than zero".into(),
            ));
        }
        if self.waveform_points == 0 {
            return Err(AudioError::Configuration(
                "waveform_points must be greater than zero".into(),
            ));
        }
        if self.codec_timeout_secs == 0 {
            return Err(AudioError::Configuration(
                "codec_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.stem_max_chars == 0 {
            return Err(AudioError::Configuration(
                "stem_max_chars must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn max_duration(&self) -> f64 {
        f64::from(self.max_duration_secs)
    }

    pub fn codec_timeout(&self) -> Duration {
        Duration::from_secs(self.codec_timeout_secs)
    }

    pub fn is_supported(&self, format: AudioFormat) -> bool {
        self.supported_formats.contains(&format)
    }

    /// Comma-separated list used in error messages.
    pub fn supported_list(&self) -> String {
        self.supported_formats
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Allocate a unique stored-name stem with the configured prefix and stem cap.
    pub fn unique_name(&self, user_id: &str, original_filename: &str) -> String {
        crate::naming::unique_name_capped(
            &self.filename_prefix,
            self.stem_max_chars,
            user_id,
            original_filename,
        )
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AudioError::Configuration(format!("invalid value for {ENV_PREFIX}{name}: '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_upload_limits() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_duration_secs, 60);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.supported_formats, AudioFormat::ALL.to_vec());
        assert_eq!(config.target_format, AudioFormat::Mp3);
        assert_eq!(config.target_bitrate, "128k");
        assert_eq!(config.target_sample_rate, 44_100);
        assert_eq!(config.waveform_points, 20);
        assert!(!config.downmix_to_mono);
        assert_eq!(config.stem_max_chars, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply_on_top_of_defaults() {
        let mut config = PipelineConfig::default();
        config
            .apply_env(lookup(&[
                ("CLIPWAVE_MAX_DURATION_SECS", "30"),
                ("CLIPWAVE_SUPPORTED_FORMATS", "mp3, WAV"),
                ("CLIPWAVE_TARGET_FORMAT", "ogg"),
                ("CLIPWAVE_DOWNMIX_TO_MONO", "true"),
                ("CLIPWAVE_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
                ("CLIPWAVE_STEM_MAX_CHARS", "8"),
            ]))
            .unwrap();

        assert_eq!(config.max_duration_secs, 30);
        assert_eq!(
            config.supported_formats,
            vec![AudioFormat::Mp3, AudioFormat::Wav]
        );
        assert_eq!(config.target_format, AudioFormat::Ogg);
        assert!(config.downmix_to_mono);
        assert_eq!(config.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.stem_max_chars, 8);
        assert_eq!(config.waveform_points, 20);
    }

    #[test]
    fn malformed_env_value_is_configuration_error() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_env(lookup(&[("CLIPWAVE_WAVEFORM_POINTS", "many")]))
            .unwrap_err();
        match err {
            AudioError::Configuration(message) => {
                assert!(message.contains("CLIPWAVE_WAVEFORM_POINTS"))
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_supported_set_and_zero_points() {
        let config = PipelineConfig::builder()
            .supported_formats(Vec::new())
            .build();
        assert!(matches!(
            config.validate(),
            Err(AudioError::Configuration(_))
        ));

        let config = PipelineConfig::builder().waveform_points(0).build();
        assert!(matches!(
            config.validate(),
            Err(AudioError::Configuration(_))
        ));
    }

    #[test]
    fn unique_name_uses_configured_prefix_and_stem_cap() {
        let config = PipelineConfig::builder()
            .filename_prefix("clip")
            .stem_max_chars(5)
            .build();
        let name = config.unique_name("u1", "Morning Riff.m4a");
        assert!(name.starts_with("clip_u1_"), "{name}");
        assert!(name.ends_with("_Morni"), "{name}");

        let config = PipelineConfig::builder().stem_max_chars(0).build();
        assert!(matches!(
            config.validate(),
            Err(AudioError::Configuration(_))
        ));
    }

    #[test]
    fn lossless_target_does_not_need_bitrate() {
        let config = PipelineConfig::builder()
            .target_format(AudioFormat::Flac)
            .target_bitrate("")
            .build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn supported_list_is_comma_separated() {
        assert_eq!(
            PipelineConfig::default().supported_list(),
            "mp3, m4a, wav, aac, flac, ogg"
        );
    }
}
