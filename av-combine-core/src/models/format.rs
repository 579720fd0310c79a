use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoder output formats probed in order until the host accepts one.
///
/// The combined MP4 container is the most widely playable; WebM pairings
/// follow, VP9 before VP8.
pub const DEFAULT_FORMAT_PREFERENCES: [&str; 3] =
    ["video/mp4", "video/webm;codecs=vp9", "video/webm;codecs=vp8"];

/// Tag used when none of the preferred formats is supported and the host
/// does not report what its default encoder produces.
pub const FALLBACK_FORMAT: &str = "video/webm";

/// A negotiated encoder output format, as a MIME string with optional codecs
/// parameter (e.g. `video/webm;codecs=vp9`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputFormat(String);

impl OutputFormat {
    pub fn new(mime: impl Into<String>) -> Self {
        Self(mime.into())
    }

    pub fn mime(&self) -> &str {
        &self.0
    }

    /// Container portion of the MIME string, without parameters.
    pub fn container(&self) -> &str {
        self.0.split(';').next().unwrap_or_default().trim()
    }

    /// Value of the `codecs=` parameter, if present.
    pub fn codecs(&self) -> Option<&str> {
        self.0
            .split(';')
            .skip(1)
            .filter_map(|param| param.trim().strip_prefix("codecs="))
            .map(|codecs| codecs.trim_matches('"'))
            .next()
    }

    pub fn file_extension(&self) -> &'static str {
        match self.container() {
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            "video/x-matroska" => "mkv",
            _ => "bin",
        }
    }

    pub fn default_preferences() -> Vec<OutputFormat> {
        DEFAULT_FORMAT_PREFERENCES.iter().map(|m| OutputFormat::new(*m)).collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
