//! YouTube (and anything yt-dlp understands)
//!
//! Runs `yt-dlp -J` as a subprocess and reads its JSON dump. The extracted
//! URLs are signed and expire after a few hours, hence `refreshable`.

use crate::{AudioSourceResolver, DEFAULT_DURATION_SECS, ResolveError, ResolvedAudio, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// Default executable name, looked up in `PATH`
pub const DEFAULT_BINARY: &str = "yt-dlp";

#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    binary: String,
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

#[derive(Debug, Deserialize)]
struct InfoDump {
    url: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    #[serde(default)]
    formats: Vec<FormatInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    url: Option<String>,
    acodec: Option<String>,
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Convert a `yt-dlp -J` dump into a [`ResolvedAudio`]
    fn parse_dump(locator: &str, json: &[u8]) -> Result<ResolvedAudio> {
        let info: InfoDump = serde_json::from_slice(json)
            .map_err(|e| ResolveError::Extractor(format!("invalid yt-dlp output: {e}")))?;

        // Pas d'URL de premier niveau : dernier format qui porte de l'audio
        let audio_url = info
            .url
            .filter(|u| !u.is_empty())
            .or_else(|| {
                info.formats
                    .iter()
                    .rev()
                    .filter(|f| f.acodec.as_deref() != Some("none"))
                    .find_map(|f| f.url.clone())
            })
            .ok_or_else(|| ResolveError::NoAudioStream(locator.to_string()))?;

        let duration = info
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.round() as u64)
            .unwrap_or(DEFAULT_DURATION_SECS);

        Ok(ResolvedAudio {
            audio_url,
            title: info.title,
            artist: info.uploader,
            duration_secs: Some(duration),
            thumbnail: info.thumbnail,
        })
    }
}

#[async_trait]
impl AudioSourceResolver for YtDlpResolver {
    fn kind(&self) -> &'static str {
        "youtube"
    }

    fn refreshable(&self) -> bool {
        true
    }

    async fn resolve(&self, locator: &str) -> Result<ResolvedAudio> {
        let locator = locator.trim();
        if !(locator.starts_with("http://") || locator.starts_with("https://")) {
            return Err(ResolveError::InvalidLocator(locator.to_string()));
        }

        debug!(locator, binary = %self.binary, "Running yt-dlp");

        let output = Command::new(&self.binary)
            .args(["-J", "-f", "bestaudio/best", "--no-warnings", "--no-playlist"])
            .arg(locator)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ResolveError::Extractor(format!("cannot run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(if message.contains("Video unavailable") || message.contains("404") {
                ResolveError::NotFound(message.to_string())
            } else {
                ResolveError::Extractor(message.to_string())
            });
        }

        Self::parse_dump(locator, &output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOCATOR: &str = "https://www.youtube.com/watch?v=kXYiU_JCYtU";

    #[test]
    fn test_top_level_url_wins() {
        let dump = json!({
            "url": "https://rr1.googlevideo.com/top",
            "title": "Numb",
            "uploader": "Linkin Park",
            "duration": 187.4,
            "thumbnail": "https://i.ytimg.com/vi/kXYiU_JCYtU/hq.jpg",
            "formats": [{"url": "https://rr1.googlevideo.com/fmt", "acodec": "opus"}]
        });
        let audio = YtDlpResolver::parse_dump(LOCATOR, dump.to_string().as_bytes()).unwrap();
        assert_eq!(audio.audio_url, "https://rr1.googlevideo.com/top");
        assert_eq!(audio.title.as_deref(), Some("Numb"));
        assert_eq!(audio.artist.as_deref(), Some("Linkin Park"));
        assert_eq!(audio.duration_secs, Some(187));
    }

    #[test]
    fn test_falls_back_to_last_audio_format() {
        let dump = json!({
            "title": "Numb",
            "formats": [
                {"url": "https://a/1", "acodec": "mp4a.40.2"},
                {"url": "https://a/2", "acodec": "opus"},
                {"url": "https://a/video-only", "acodec": "none"}
            ]
        });
        let audio = YtDlpResolver::parse_dump(LOCATOR, dump.to_string().as_bytes()).unwrap();
        assert_eq!(audio.audio_url, "https://a/2");
        assert_eq!(audio.duration_secs, Some(DEFAULT_DURATION_SECS));
        assert!(audio.artist.is_none());
    }

    #[test]
    fn test_no_audio_stream() {
        let dump = json!({"formats": [{"url": "https://a/v", "acodec": "none"}]});
        let err = YtDlpResolver::parse_dump(LOCATOR, dump.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, ResolveError::NoAudioStream(_)));
    }

    #[test]
    fn test_garbage_output() {
        let err = YtDlpResolver::parse_dump(LOCATOR, b"ERROR: nope").unwrap_err();
        assert!(matches!(err, ResolveError::Extractor(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_url_locator() {
        let resolver = YtDlpResolver::default();
        let err = resolver.resolve("not a url").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidLocator(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_extractor_error() {
        let resolver = YtDlpResolver::new("/nonexistent/yt-dlp-binary");
        let err = resolver.resolve(LOCATOR).await.unwrap_err();
        assert!(matches!(err, ResolveError::Extractor(_)));
    }

    #[tokio::test]
    #[ignore = "requires yt-dlp and network access"]
    async fn test_real_extraction() {
        let audio = YtDlpResolver::default().resolve(LOCATOR).await.unwrap();
        assert!(audio.audio_url.starts_with("https://"));
    }
}
