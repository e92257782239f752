//! ffprobe output parsing and ffmpeg argument building for [`super::FfmpegCodec`].

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use serde::Deserialize;

use super::ProbeInfo;
use crate::error::AudioError;
use crate::transcoder::TranscodePlan;
use crate::types::AudioFormat;

// ffprobe omits fields (or prints "N/A") for some containers, e.g. raw AAC
// has no stream duration. Everything is optional and format-level values
// are the fallback.
#[derive(Debug, Deserialize)]
struct RawProbeOutput {
    #[serde(default)]
    streams: Vec<RawProbeStream>,
    format: Option<RawProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct RawProbeStream {
    codec_type: String,
    sample_rate: Option<String>,
    channels: Option<u16>,
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProbeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

fn parse_field<T: std::str::FromStr>(value: Option<&String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

pub(super) fn parse_probe_output(stdout: &[u8]) -> Result<ProbeInfo, AudioError> {
    let raw: RawProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| AudioError::decode_with("unreadable ffprobe output", e))?;

    let stream = raw
        .streams
        .iter()
        .find(|stream| stream.codec_type == "audio")
        .ok_or_else(|| AudioError::decode("no audio stream found"))?;
    let format = raw.format.as_ref();

    let duration: f64 = parse_field(stream.duration.as_ref())
        .or_else(|| parse_field(format.and_then(|f| f.duration.as_ref())))
        .filter(|d: &f64| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| AudioError::decode("could not determine duration"))?;

    let sample_rate: u32 = parse_field(stream.sample_rate.as_ref()).unwrap_or(0);
    let channels = stream.channels.unwrap_or(0);
    if sample_rate == 0 || channels == 0 {
        return Err(AudioError::decode(format!(
            "invalid stream parameters: {sample_rate} Hz, {channels} channel(s)"
        )));
    }

    let bit_rate = parse_field(stream.bit_rate.as_ref())
        .or_else(|| parse_field(format.and_then(|f| f.bit_rate.as_ref())));

    Ok(ProbeInfo {
        duration,
        sample_rate,
        channels,
        bit_rate,
    })
}

pub(super) fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-v", "error", "-show_streams", "-show_format", "-of", "json"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(path.as_os_str().to_owned());
    args
}

fn base_args() -> Vec<OsString> {
    ["-hide_banner", "-loglevel", "error", "-nostdin"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn push(args: &mut Vec<OsString>, values: &[&str]) {
    args.extend(values.iter().map(OsString::from));
}

pub(super) fn encode_args(input: &Path, output: &Path, plan: &TranscodePlan) -> Vec<OsString> {
    let mut args = base_args();
    push(&mut args, &["-y", "-i"]);
    args.push(input.as_os_str().to_owned());
    if let Some(trim_to) = plan.trim_to {
        push(&mut args, &["-t", &format!("{trim_to:.3}")]);
    }
    push(&mut args, &["-vn", "-map_metadata", "-1"]);
    // rate and layout are left to ffmpeg's negotiation unless the plan forces them
    if let Some(rate) = plan.resample_to {
        push(&mut args, &["-ar", &rate.to_string()]);
    }
    if let Some(channels) = plan.channels {
        push(&mut args, &["-ac", &channels.to_string()]);
    }
    push(&mut args, &["-c:a", plan.format.encoder()]);
    if plan.format.is_lossy() {
        push(&mut args, &["-b:a", &plan.bitrate]);
    }
    if plan.format == AudioFormat::Mp3 {
        // VBR quality for LAME
        push(&mut args, &["-q:a", "2"]);
    }
    push(&mut args, &["-f", plan.format.muxer()]);
    args.push(output.as_os_str().to_owned());
    args
}

pub(super) fn decode_args(path: &Path, sample_rate: u32) -> Vec<OsString> {
    let mut args = base_args();
    args.push(OsString::from("-i"));
    args.push(path.as_os_str().to_owned());
    push(
        &mut args,
        &[
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "-",
        ],
    );
    args
}

pub(super) fn silence_args(
    output: &Path,
    seconds: f64,
    sample_rate: u32,
    plan: &TranscodePlan,
) -> Vec<OsString> {
    let mut args = base_args();
    push(
        &mut args,
        &[
            "-y",
            "-f",
            "lavfi",
            "-i",
            &format!("anullsrc=r={sample_rate}:cl=mono"),
            "-t",
            &format!("{seconds:.3}"),
            "-c:a",
            plan.format.encoder(),
        ],
    );
    if plan.format.is_lossy() {
        push(&mut args, &["-b:a", &plan.bitrate]);
    }
    push(&mut args, &["-f", plan.format.muxer()]);
    args.push(output.as_os_str().to_owned());
    args
}

/// Interpret raw `f32le` bytes; a trailing partial sample is dropped.
pub(super) fn pcm_from_f32le(bytes: &[u8]) -> Vec<f32> {
    let whole = bytes.len() / 4;
    let mut samples = vec![0.0f32; whole];
    LittleEndian::read_f32_into(&bytes[..whole * 4], &mut samples);
    samples
}

/// Last non-empty line of a tool's stderr, for error messages.
pub(super) fn stderr_summary(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or("no diagnostic output")
        .to_string()
}

/// Resolve a codec executable.
///
/// Anything with a directory component must point at an existing file; a bare
/// program name is looked up in `path_var` only.
pub(super) fn resolve_program(
    program: &Path,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, AudioError> {
    let missing = || AudioError::DependencyMissing {
        program: program.display().to_string(),
    };

    if program.as_os_str().is_empty() {
        return Err(missing());
    }

    if program.components().count() > 1 || program.is_absolute() {
        return if program.is_file() {
            Ok(program.to_path_buf())
        } else {
            Err(missing())
        };
    }

    let path_var = path_var.ok_or_else(missing)?;
    for dir in std::env::split_paths(path_var) {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if cfg!(windows) {
            let candidate = candidate.with_extension("exe");
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(missing())
}
