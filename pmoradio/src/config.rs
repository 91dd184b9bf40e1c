//! Configuration structures for the radio.
//!
//! Typed view of the `radio` section of the YAML configuration. Every field
//! has a default so a partial section (or none at all) still yields a usable
//! configuration.

use pmoplaylist::{HistoryOrder, PlaylistConfig, PositionMode, RotationDiscipline, Track};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Top-level configuration block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioConfig {
    #[serde(default = "RadioConfig::default_name")]
    pub name: String,
    #[serde(default = "RadioConfig::default_share_base_url")]
    pub share_base_url: String,
    #[serde(default)]
    pub rotation: RotationDiscipline,
    #[serde(default = "RadioConfig::default_shuffle_on_start")]
    pub shuffle_on_start: bool,
    #[serde(default)]
    pub catch_up: CatchUpPolicy,
    #[serde(default)]
    pub position_mode: PositionMode,
    #[serde(default = "RadioConfig::default_upcoming_count")]
    pub upcoming_count: usize,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub playlist: Vec<PlaylistEntry>,
}

impl RadioConfig {
    fn default_name() -> String {
        "Madrid Rock Radio".to_string()
    }

    fn default_share_base_url() -> String {
        "https://madridrock.radio".to_string()
    }

    const fn default_shuffle_on_start() -> bool {
        true
    }

    const fn default_upcoming_count() -> usize {
        3
    }

    /// Réglages du moteur de rotation
    pub fn playlist_config(&self) -> PlaylistConfig {
        PlaylistConfig {
            rotation: self.rotation,
            history_capacity: self.history.capacity,
            history_order: self.history.order,
        }
    }

    /// Morceaux de départ (non résolus)
    pub fn initial_tracks(&self) -> Vec<Track> {
        self.playlist.iter().map(PlaylistEntry::to_track).collect()
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            share_base_url: Self::default_share_base_url(),
            rotation: RotationDiscipline::default(),
            shuffle_on_start: Self::default_shuffle_on_start(),
            catch_up: CatchUpPolicy::default(),
            position_mode: PositionMode::default(),
            upcoming_count: Self::default_upcoming_count(),
            history: HistoryConfig::default(),
            resolver: ResolverConfig::default(),
            source: SourceConfig::default(),
            playlist: Vec::new(),
        }
    }
}

/// Comportement quand plusieurs morceaux se sont écoulés entre deux lectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchUpPolicy {
    /// Une seule avance par lecture, l'horloge repart de maintenant
    #[default]
    SingleStep,
    /// Avance tant que le temps écoulé dépasse la durée, en gardant la
    /// continuité de l'horloge
    Timeline,
}

impl fmt::Display for CatchUpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatchUpPolicy::SingleStep => "single_step",
            CatchUpPolicy::Timeline => "timeline",
        })
    }
}

/// History tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub order: HistoryOrder,
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        5
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            order: HistoryOrder::default(),
        }
    }
}

/// Resolver call tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "ResolverConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ResolverConfig {
    const fn default_timeout_secs() -> u64 {
        10
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

/// Audio source selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub ytdlp: YtDlpConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Youtube,
    Telegram,
    Direct,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Telegram => "telegram",
            SourceKind::Direct => "direct",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtDlpConfig {
    #[serde(default = "YtDlpConfig::default_binary")]
    pub binary: String,
}

impl YtDlpConfig {
    fn default_binary() -> String {
        pmosource::ytdlp::DEFAULT_BINARY.to_string()
    }
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: Self::default_binary(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "TelegramConfig::default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub bot_token: String,
    /// `@name` or numeric chat id; empty keeps every chat
    #[serde(default)]
    pub channel: String,
    #[serde(default = "TelegramConfig::default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl TelegramConfig {
    fn default_api_base() -> String {
        pmosource::telegram::DEFAULT_API_BASE.to_string()
    }

    const fn default_poll_interval_secs() -> u64 {
        30
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            bot_token: String::new(),
            channel: String::new(),
            poll_interval_secs: Self::default_poll_interval_secs(),
        }
    }
}

/// Entrée de la playlist de départ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub locator: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

impl PlaylistEntry {
    pub fn to_track(&self) -> Track {
        let mut track = Track::new(self.locator.trim());
        if let Some(title) = &self.title {
            track.title = title.clone();
        }
        if let Some(artist) = &self.artist {
            track.artist = artist.clone();
        }
        if let Some(duration) = self.duration_secs {
            track.duration = duration;
        }
        track
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: RadioConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.name, "Madrid Rock Radio");
        assert_eq!(config.rotation, RotationDiscipline::RotateToTail);
        assert_eq!(config.catch_up, CatchUpPolicy::SingleStep);
        assert_eq!(config.position_mode, PositionMode::Clamped);
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.history.order, HistoryOrder::NewestFirst);
        assert_eq!(config.resolver.timeout(), Duration::from_secs(10));
        assert_eq!(config.source.kind, SourceKind::Youtube);
        assert!(config.playlist.is_empty());
    }

    #[test]
    fn test_partial_section() {
        let yaml = r#"
rotation: cyclic
catch_up: timeline
position_mode: wrapping
history:
  order: oldest_first
source:
  kind: telegram
  telegram:
    bot_token: "123:abc"
playlist:
  - locator: https://files.example/a.mp3
    title: A
    duration_secs: 42
"#;
        let config: RadioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rotation, RotationDiscipline::Cyclic);
        assert_eq!(config.catch_up, CatchUpPolicy::Timeline);
        assert_eq!(config.position_mode, PositionMode::Wrapping);
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.history.order, HistoryOrder::OldestFirst);
        assert_eq!(config.source.kind, SourceKind::Telegram);
        assert_eq!(config.source.telegram.poll_interval_secs, 30);

        let tracks = config.initial_tracks();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "A");
        assert_eq!(tracks[0].artist, "");
        assert_eq!(tracks[0].duration, 42);
    }

    #[test]
    fn test_unknown_rotation_is_rejected() {
        assert!(serde_yaml::from_str::<RadioConfig>("rotation: shuffle").is_err());
    }
}
