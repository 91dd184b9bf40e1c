//! # PMOSource
//!
//! Audio sources for PMORadio.
//!
//! This crate provides the two seams through which the radio talks to the
//! outside world:
//!
//! - [`AudioSourceResolver`]: turns a track locator (YouTube URL, Telegram
//!   file id, direct link...) into a playable audio URL plus metadata.
//! - [`IngestionSource`]: discovers new tracks to append to the playlist.
//!
//! ## Implementations
//!
//! | Kind | Resolver | Ingestion | Expiring URLs |
//! |------|----------|-----------|---------------|
//! | `youtube` | [`YtDlpResolver`] | - | yes |
//! | `telegram` | [`TelegramSource`] | [`TelegramSource`] | yes |
//! | `direct` | [`DirectResolver`] | - | no |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pmosource::{AudioSourceResolver, YtDlpResolver};
//!
//! # async fn demo() -> pmosource::Result<()> {
//! let resolver = YtDlpResolver::new("yt-dlp");
//! let audio = resolver
//!     .resolve("https://www.youtube.com/watch?v=60ItHLz5WEA")
//!     .await?;
//! println!("{} -> {}", audio.title.unwrap_or_default(), audio.audio_url);
//! # Ok(())
//! # }
//! ```

pub mod direct;
pub mod filename;
pub mod ingest;
pub mod telegram;
pub mod ytdlp;

pub use direct::DirectResolver;
pub use filename::parse_filename;
pub use ingest::{DiscoveredTrack, IngestionSource};
pub use telegram::TelegramSource;
pub use ytdlp::YtDlpResolver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Duration reported when an extractor knows nothing about the track length
pub const DEFAULT_DURATION_SECS: u64 = 180;

/// Error types for audio resolution and ingestion
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Resolution timed out after {0:?}")]
    Timeout(Duration),

    #[error("Extractor failed: {0}")]
    Extractor(String),

    #[error("No audio stream available for {0}")]
    NoAudioStream(String),
}

impl ResolveError {
    /// True when a later retry may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ResolveError::Network(_) | ResolveError::Timeout(_))
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            ResolveError::NotFound(err.to_string())
        } else {
            ResolveError::Network(err.to_string())
        }
    }
}

/// Result type for source operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Playable audio plus whatever metadata the source could provide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAudio {
    pub audio_url: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration_secs: Option<u64>,
    pub thumbnail: Option<String>,
}

impl ResolvedAudio {
    /// Audio URL with no metadata
    pub fn url_only(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            title: None,
            artist: None,
            duration_secs: None,
            thumbnail: None,
        }
    }
}

/// Resolves a track locator into a playable audio URL
///
/// Implementations must be cheap to share (`Arc<dyn AudioSourceResolver>`)
/// and must fail with a [`ResolveError`] rather than panic on any input.
#[async_trait]
pub trait AudioSourceResolver: Debug + Send + Sync {
    /// Short identifier of the source kind (`youtube`, `telegram`, `direct`)
    fn kind(&self) -> &'static str;

    /// True when resolved URLs expire and must be re-resolved before use
    fn refreshable(&self) -> bool;

    /// Resolve a locator
    async fn resolve(&self, locator: &str) -> Result<ResolvedAudio>;
}
