//! Upload request and ingestion result.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::asset::AudioAsset;

/// Who may listen to an uploaded clip.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Privacy {
    #[default]
    Public,
    Followers,
    Private,
}

/// A raw upload as received from a client.
///
/// ```
/// use clipwave::types::{Privacy, UploadRequest};
///
/// let request = UploadRequest::builder()
///     .bytes(vec![0u8; 4])
///     .filename("take 1.m4a")
///     .title("Morning riff")
///     .privacy(Privacy::Followers)
///     .build();
/// assert_eq!(request.artist, None);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    /// Filename declared by the client; only its extension and stem are trusted.
    #[builder(into)]
    pub filename: String,
    #[builder(into)]
    pub title: Option<String>,
    #[builder(into)]
    pub artist: Option<String>,
    #[builder(default)]
    pub privacy: Privacy,
}

/// Result of a full ingest: the processed asset plus the caller's descriptive fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestedAudio {
    /// Unique stem the asset was stored under.
    pub stem: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub privacy: Privacy,
    pub asset: AudioAsset,
}
