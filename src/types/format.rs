//! Audio container formats accepted and produced by the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Audio container format, keyed by file extension.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Wav,
    Aac,
    Flac,
    Ogg,
}

impl AudioFormat {
    /// Every format the pipeline knows how to read.
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Wav,
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::Ogg,
    ];

    /// Parse the extension of a (client-supplied) filename.
    ///
    /// Returns the raw lowercase extension on failure so callers can report it.
    pub fn from_filename(filename: &str) -> Result<Self, String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        extension.parse().map_err(|_| extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }

    /// ffmpeg muxer name for writing this container.
    pub fn muxer(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "ipod",
            Self::Wav => "wav",
            Self::Aac => "adts",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }

    /// ffmpeg encoder used when this is the target format.
    pub fn encoder(self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::M4a | Self::Aac => "aac",
            Self::Wav => "pcm_s16le",
            Self::Flac => "flac",
            Self::Ogg => "libvorbis",
        }
    }

    /// Whether the target bitrate applies when encoding.
    pub fn is_lossy(self) -> bool {
        !matches!(self, Self::Wav | Self::Flac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extension_case_insensitively() {
        assert_eq!(AudioFormat::from_filename("Song.MP3"), Ok(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_filename("voice memo.m4a"), Ok(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_filename("a.b.flac"), Ok(AudioFormat::Flac));
    }

    #[test]
    fn reports_unsupported_extension() {
        assert_eq!(AudioFormat::from_filename("notes.TXT"), Err("txt".to_string()));
        assert_eq!(AudioFormat::from_filename("no_extension"), Err(String::new()));
    }

    #[test]
    fn display_matches_extension() {
        for format in AudioFormat::ALL {
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
