//! Maps validated video identifiers to files under the videos directory.

use super::quality::Quality;
use crate::error::{Result, VidlibError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SUBTITLES_FILE: &str = "subtitles.vtt";
pub const THUMBNAIL_FILE: &str = "thumbnail.jpg";
pub const SUMMARY_FILE: &str = "summary.txt";

const FORBIDDEN: &[&str] = &["..", "/", "\\", ":", "*", "?", "\"", "<", ">", "|"];

/// Reject identifiers that could escape the video directory.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || FORBIDDEN.iter().any(|f| id.contains(f)) {
        return Err(VidlibError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}

/// Availability of a single quality.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QualityInfo {
    pub name: Quality,
    pub label: &'static str,
    pub file: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub id: String,
    pub qualities: Vec<QualityInfo>,
}

/// File-level metadata for the default rendition.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub id: String,
    pub size: u64,
    pub format: &'static str,
    pub last_modified: String,
    pub has_thumbnail: bool,
    pub has_subtitles: bool,
    pub has_summary: bool,
}

/// Resolves media assets stored as `<root>/<id>/<file>`.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    root: PathBuf,
}

impl MediaResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn asset_path(&self, id: &str, file: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(id).join(file))
    }

    async fn existing(&self, id: &str, file: &str) -> Result<PathBuf> {
        let path = self.asset_path(id, file)?;
        if is_file(&path).await {
            Ok(path)
        } else {
            Err(VidlibError::AssetNotFound(format!("{}/{}", id, file)))
        }
    }

    /// Resolve a video file. A requested quality that is not on disk falls
    /// back once to the default rendition.
    pub async fn resolve_video(&self, id: &str, quality: Option<&str>) -> Result<PathBuf> {
        validate_id(id)?;

        let quality = match quality.map(str::trim).filter(|q| !q.is_empty()) {
            Some(tag) => tag.parse::<Quality>()?,
            None => Quality::Default,
        };

        if quality != Quality::Default {
            let path = self.asset_path(id, quality.file_name())?;
            if is_file(&path).await {
                return Ok(path);
            }
            debug!(id, %quality, "Quality not available, falling back to default");
        }

        self.existing(id, Quality::Default.file_name()).await
    }

    pub async fn resolve_subtitles(&self, id: &str) -> Result<PathBuf> {
        self.existing(id, SUBTITLES_FILE).await
    }

    pub async fn resolve_thumbnail(&self, id: &str) -> Result<PathBuf> {
        self.existing(id, THUMBNAIL_FILE).await
    }

    /// Read the whole summary as raw bytes. No encoding is enforced.
    pub async fn read_summary(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.existing(id, SUMMARY_FILE).await?;
        Ok(tokio::fs::read(path).await?)
    }

    /// List every quality with its availability.
    pub async fn video_info(&self, id: &str) -> Result<VideoInfo> {
        self.resolve_video(id, None).await?;

        let mut qualities = Vec::with_capacity(Quality::ALL.len());
        for quality in Quality::ALL {
            let path = self.asset_path(id, quality.file_name())?;
            qualities.push(QualityInfo {
                name: quality,
                label: quality.label(),
                file: quality.file_name(),
                available: is_file(&path).await,
            });
        }

        Ok(VideoInfo {
            id: id.to_string(),
            qualities,
        })
    }

    /// Size, modification time and sibling assets of the default rendition.
    pub async fn video_metadata(&self, id: &str) -> Result<VideoMetadata> {
        let video = self.resolve_video(id, None).await?;
        let meta = tokio::fs::metadata(&video).await?;
        let modified: DateTime<Utc> = meta.modified()?.into();

        Ok(VideoMetadata {
            id: id.to_string(),
            size: meta.len(),
            format: "mp4",
            last_modified: modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            has_thumbnail: is_file(&self.asset_path(id, THUMBNAIL_FILE)?).await,
            has_subtitles: is_file(&self.asset_path(id, SUBTITLES_FILE)?).await,
            has_summary: is_file(&self.asset_path(id, SUMMARY_FILE)?).await,
        })
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(files: &[&str]) -> (TempDir, MediaResolver) {
        let dir = TempDir::new().unwrap();
        let video_dir = dir.path().join("abc");
        std::fs::create_dir_all(&video_dir).unwrap();
        for file in files {
            std::fs::write(video_dir.join(file), file.as_bytes()).unwrap();
        }
        let resolver = MediaResolver::new(dir.path());
        (dir, resolver)
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("abc").is_ok());
        assert!(validate_id("lecture-01_v2").is_ok());
        for bad in ["", "..", "../etc/passwd", "a/b", "a\\b", "c:", "a*", "a?", "\"a\"", "<a>", "a|b"] {
            assert!(
                matches!(validate_id(bad), Err(VidlibError::InvalidIdentifier(_))),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_traversal_is_rejected_before_filesystem() {
        let (_dir, resolver) = fixture(&["video.mp4"]);
        let err = resolver.resolve_video("../etc/passwd", None).await.unwrap_err();
        assert!(matches!(err, VidlibError::InvalidIdentifier(_)));
        let err = resolver.read_summary("..").await.unwrap_err();
        assert!(matches!(err, VidlibError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_default_video() {
        let (dir, resolver) = fixture(&["video.mp4"]);
        let path = resolver.resolve_video("abc", None).await.unwrap();
        assert_eq!(path, dir.path().join("abc").join("video.mp4"));

        let path = resolver.resolve_video("abc", Some("")).await.unwrap();
        assert_eq!(path, dir.path().join("abc").join("video.mp4"));
    }

    #[tokio::test]
    async fn test_quality_present() {
        let (dir, resolver) = fixture(&["video.mp4", "video_720p.mp4"]);
        let path = resolver.resolve_video("abc", Some("720p")).await.unwrap();
        assert_eq!(path, dir.path().join("abc").join("video_720p.mp4"));
    }

    #[tokio::test]
    async fn test_quality_falls_back_once() {
        let (dir, resolver) = fixture(&["video.mp4"]);
        let path = resolver.resolve_video("abc", Some("480p")).await.unwrap();
        assert_eq!(path, dir.path().join("abc").join("video.mp4"));
    }

    #[tokio::test]
    async fn test_quality_and_default_missing() {
        let (_dir, resolver) = fixture(&["video_480p.mp4"]);
        let err = resolver.resolve_video("abc", Some("720p")).await.unwrap_err();
        assert!(matches!(err, VidlibError::AssetNotFound(_)));
        let err = resolver.resolve_video("abc", None).await.unwrap_err();
        assert!(matches!(err, VidlibError::AssetNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_quality_is_invalid_input() {
        let (_dir, resolver) = fixture(&["video.mp4"]);
        let err = resolver.resolve_video("abc", Some("4k")).await.unwrap_err();
        assert!(matches!(err, VidlibError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_summary_is_returned_verbatim() {
        let (dir, resolver) = fixture(&["video.mp4"]);
        let latin1 = b"Resumen de la lecci\xf3n\n";
        std::fs::write(dir.path().join("abc").join(SUMMARY_FILE), latin1).unwrap();
        assert_eq!(resolver.read_summary("abc").await.unwrap(), latin1);
    }

    #[tokio::test]
    async fn test_sibling_assets() {
        let (_dir, resolver) = fixture(&["video.mp4", "summary.txt", "subtitles.vtt"]);
        assert_eq!(resolver.read_summary("abc").await.unwrap(), b"summary.txt");
        assert!(resolver.resolve_subtitles("abc").await.is_ok());
        assert!(matches!(
            resolver.resolve_thumbnail("abc").await,
            Err(VidlibError::AssetNotFound(_))
        ));
        assert!(matches!(
            resolver.read_summary("missing").await,
            Err(VidlibError::AssetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_video_info() {
        let (_dir, resolver) = fixture(&["video.mp4", "video_360p.mp4"]);
        let info = resolver.video_info("abc").await.unwrap();
        assert_eq!(info.id, "abc");
        assert_eq!(info.qualities.len(), 5);

        let available: Vec<_> = info
            .qualities
            .iter()
            .filter(|q| q.available)
            .map(|q| q.name)
            .collect();
        assert_eq!(available, vec![Quality::P360, Quality::Default]);
        assert_eq!(info.qualities[0].label, "Mobile (360p)");
    }

    #[tokio::test]
    async fn test_video_metadata() {
        let (_dir, resolver) = fixture(&["video.mp4", "thumbnail.jpg"]);
        let meta = resolver.video_metadata("abc").await.unwrap();
        assert_eq!(meta.size, "video.mp4".len() as u64);
        assert_eq!(meta.format, "mp4");
        assert!(meta.has_thumbnail);
        assert!(!meta.has_subtitles);
        assert!(!meta.has_summary);
        assert!(DateTime::parse_from_rfc3339(&meta.last_modified).is_ok());
    }

    #[tokio::test]
    async fn test_info_requires_default_video() {
        let (_dir, resolver) = fixture(&["video_720p.mp4"]);
        assert!(matches!(
            resolver.video_info("abc").await,
            Err(VidlibError::AssetNotFound(_))
        ));
    }
}
