//! Pre-flight checks on uploaded files.
//!
//! The combination session trusts its inputs; these checks run before a
//! file is accepted for combination.

use crate::models::config::CombineConfiguration;
use crate::models::error::CombineError;
use crate::models::media::MediaFile;

/// Accepted video media types. The subtype doubles as the accepted extension.
pub const VIDEO_TYPES: [&str; 3] = ["video/mp4", "video/avi", "video/mov"];

/// Accepted audio media types. The subtype doubles as the accepted extension.
pub const AUDIO_TYPES: [&str; 3] = ["audio/mp3", "audio/wav", "audio/aac"];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Check `file` against a size limit and a list of accepted media types.
///
/// A file of exactly `max_bytes` passes. The declared media type is matched
/// first; when it does not match, the file name extension is compared with
/// the subtype of each accepted type (`video/mov` accepts `clip.MOV`).
pub fn validate_file(file: &MediaFile, max_bytes: u64, allowed_types: &[&str]) -> Result<(), CombineError> {
    log::debug!(
        "validating {} ({} bytes, type {:?}) against max {}",
        file.name,
        file.size_bytes(),
        file.media_type,
        max_bytes
    );

    if file.size_bytes() > max_bytes {
        return Err(CombineError::Validation(format!(
            "file exceeds size limit, max allowed {}",
            format_file_size(max_bytes)
        )));
    }

    let declared = file.media_type.to_ascii_lowercase();
    if !declared.is_empty() && allowed_types.iter().any(|t| declared.contains(t)) {
        return Ok(());
    }

    if let Some(ext) = file.extension() {
        let by_extension = allowed_types
            .iter()
            .filter_map(|t| t.split_once('/').map(|(_, subtype)| subtype))
            .any(|subtype| subtype == ext);
        if by_extension {
            return Ok(());
        }
    }

    Err(CombineError::Validation("unsupported file format".into()))
}

pub fn validate_video(file: &MediaFile, config: &CombineConfiguration) -> Result<(), CombineError> {
    validate_file(file, config.video_max_bytes, &VIDEO_TYPES)
}

pub fn validate_audio(file: &MediaFile, config: &CombineConfiguration) -> Result<(), CombineError> {
    validate_file(file, config.audio_max_bytes, &AUDIO_TYPES)
}

/// Human-readable size using 1024-based units, e.g. `1536 → "1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}
