//! Tests for the error system.

use std::path::PathBuf;

use clipwave::error::*;

#[test]
fn error_classification_is_stable_for_every_variant() {
    struct Case {
        error: AudioError,
        category: ErrorCategory,
        code: ErrorCode,
        client: bool,
    }

    let cases = vec![
        Case {
            error: AudioError::Format {
                extension: "txt".into(),
                supported: "mp3, wav".into(),
            },
            category: ErrorCategory::Input,
            code: ErrorCode::UnsupportedFormat,
            client: true,
        },
        Case {
            error: AudioError::Size {
                size: 11 * 1024 * 1024,
                max: 10 * 1024 * 1024,
            },
            category: ErrorCategory::Input,
            code: ErrorCode::FileTooLarge,
            client: true,
        },
        Case {
            error: AudioError::decode("no audio stream"),
            category: ErrorCategory::Input,
            code: ErrorCode::InvalidAudio,
            client: true,
        },
        Case {
            error: AudioError::NotFound(PathBuf::from("/tmp/missing.mp3")),
            category: ErrorCategory::Input,
            code: ErrorCode::NotFound,
            client: true,
        },
        Case {
            error: AudioError::encode("libmp3lame missing"),
            category: ErrorCategory::Codec,
            code: ErrorCode::EncodingFailed,
            client: false,
        },
        Case {
            error: AudioError::DependencyMissing {
                program: "ffmpeg".into(),
            },
            category: ErrorCategory::Dependency,
            code: ErrorCode::DependencyMissing,
            client: false,
        },
        Case {
            error: AudioError::Timeout(120_000),
            category: ErrorCategory::Timeout,
            code: ErrorCode::Timeout,
            client: false,
        },
        Case {
            error: AudioError::Configuration("bad".into()),
            category: ErrorCategory::Configuration,
            code: ErrorCode::InvalidConfiguration,
            client: false,
        },
        Case {
            error: AudioError::processing("worker panicked"),
            category: ErrorCategory::Internal,
            code: ErrorCode::ProcessingFailed,
            client: false,
        },
        Case {
            error: std::io::Error::new(std::io::ErrorKind::Other, "disk").into(),
            category: ErrorCategory::Internal,
            code: ErrorCode::Io,
            client: false,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.category, "{}", case.error);
        assert_eq!(case.error.code(), case.code, "{}", case.error);
        assert_eq!(case.error.is_client_error(), case.client, "{}", case.error);
    }
}

#[test]
fn format_error_lists_supported_formats() {
    let err = AudioError::Format {
        extension: "txt".into(),
        supported: "mp3, m4a, wav, aac, flac, ogg".into(),
    };
    assert_eq!(
        err.to_string(),
        "Unsupported format: txt. Supported: mp3, m4a, wav, aac, flac, ogg"
    );
}

#[test]
fn dependency_message_names_program() {
    let err = AudioError::DependencyMissing {
        program: "ffprobe".into(),
    };
    assert!(err.to_string().starts_with("ffprobe not found"));
}

#[test]
fn error_codes_serialize_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&ErrorCode::FileTooLarge).unwrap(),
        "\"file_too_large\""
    );
    assert_eq!(
        serde_json::from_str::<ErrorCode>("\"invalid_audio\"").unwrap(),
        ErrorCode::InvalidAudio
    );
}
