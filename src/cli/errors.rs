//! CLI-specific error formatting for user-facing messages.

use crate::error::AudioError;

/// Map an [`AudioError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &AudioError) -> String {
    match err {
        AudioError::DependencyMissing { program } => format!(
            "{program} not found. Install ffmpeg or set CLIPWAVE_FFMPEG / CLIPWAVE_FFPROBE"
        ),
        AudioError::Configuration(msg) => {
            format!("Configuration error: {msg}. Check your config.toml or CLIPWAVE_* variables")
        }
        AudioError::Timeout(ms) => format!(
            "Codec timed out after {ms}ms. Raise codec_timeout_secs if the input is valid"
        ),
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_missing_names_env_overrides() {
        let err = AudioError::DependencyMissing {
            program: "ffprobe".to_string(),
        };
        let help = format_error_help(&err);
        assert!(help.starts_with("ffprobe not found"));
        assert!(help.contains("CLIPWAVE_FFPROBE"));
    }

    #[test]
    fn timeout_suggests_config_key() {
        let help = format_error_help(&AudioError::Timeout(120_000));
        assert!(help.contains("120000ms"));
        assert!(help.contains("codec_timeout_secs"));
    }

    #[test]
    fn other_error_falls_through_to_display() {
        let err = AudioError::Size {
            size: 20 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert_eq!(format_error_help(&err), err.to_string());
    }
}
