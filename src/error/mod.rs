//! Error types for clipwave.

pub mod unified;

pub use unified::{ErrorCategory, ErrorCode};

use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Primary error type for all pipeline operations.
///
/// Every variant is fatal to the request that produced it. The waveform
/// summarizer and temp-file cleanup never surface one of these.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Unsupported format: {extension}. Supported: {supported}")]
    Format { extension: String, supported: String },

    #[error("File too large: {:.1}MB. Max: {:.1}MB", mib(.size), mib(.max))]
    Size { size: u64, max: u64 },

    #[error("Invalid audio file: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Encoding failed: {message}")]
    Encode {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Error processing audio file: {message}")]
    Processing {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{program} not found. Please install it or configure its path.")]
    DependencyMissing { program: String },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn mib(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0)
}

impl AudioError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }

    pub fn decode_with(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
            source: None,
        }
    }

    pub fn encode_with(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Encode {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
            source: None,
        }
    }

    pub fn processing_with(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Processing {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Format { .. } | Self::Size { .. } | Self::Decode { .. } | Self::NotFound(_) => {
                ErrorCategory::Input
            }
            Self::Encode { .. } => ErrorCategory::Codec,
            Self::DependencyMissing { .. } => ErrorCategory::Dependency,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Processing { .. } | Self::Io(_) => ErrorCategory::Internal,
        }
    }

    /// Machine-readable code for API responses.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Format { .. } => ErrorCode::UnsupportedFormat,
            Self::Size { .. } => ErrorCode::FileTooLarge,
            Self::Decode { .. } => ErrorCode::InvalidAudio,
            Self::Encode { .. } => ErrorCode::EncodingFailed,
            Self::Processing { .. } => ErrorCode::ProcessingFailed,
            Self::DependencyMissing { .. } => ErrorCode::DependencyMissing,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Configuration(_) => ErrorCode::InvalidConfiguration,
            Self::Io(_) => ErrorCode::Io,
        }
    }

    /// Whether the uploader caused this error (bad file) rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AudioError>;
