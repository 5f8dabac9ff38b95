//! Video quality variants.

use crate::error::VidlibError;
use serde::Serialize;

/// A video rendition stored next to the default file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    Default,
}

impl Quality {
    /// All qualities, lowest first, default last.
    pub const ALL: [Quality; 5] = [
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
        Quality::Default,
    ];

    /// File name of this rendition inside the video directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Quality::P360 => "video_360p.mp4",
            Quality::P480 => "video_480p.mp4",
            Quality::P720 => "video_720p.mp4",
            Quality::P1080 => "video_1080p.mp4",
            Quality::Default => "video.mp4",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Quality::P360 => "Mobile (360p)",
            Quality::P480 => "Low (480p)",
            Quality::P720 => "Medium (720p)",
            Quality::P1080 => "High (1080p)",
            Quality::Default => "Default",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::P360 => "360p",
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::Default => "default",
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = VidlibError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "360p" => Ok(Quality::P360),
            "480p" => Ok(Quality::P480),
            "720p" => Ok(Quality::P720),
            "1080p" => Ok(Quality::P1080),
            "default" => Ok(Quality::Default),
            _ => Err(VidlibError::InvalidInput(format!("Unknown video quality: {}", s))),
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
