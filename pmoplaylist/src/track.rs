//! Track : un morceau de la rotation

use serde::{Deserialize, Serialize};

/// Titre affiché quand la source n'en fournit aucun
pub const UNKNOWN_TITLE: &str = "Unknown Track";

/// Artiste affiché quand la source n'en fournit aucun
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Un morceau de la playlist
///
/// L'identité (`id`) est opaque et unique : deux morceaux pointant vers le
/// même `locator` restent deux entrées distinctes de la rotation.
///
/// La durée est en secondes et pilote la rotation. Une durée de 0 signifie
/// « inconnue » jusqu'à la résolution du morceau.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub locator: String,
    pub title: String,
    pub artist: String,
    pub duration: u64,
    pub audio_url: Option<String>,
    pub thumbnail: Option<String>,
}

impl Track {
    /// Crée un morceau non résolu avec une identité neuve
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            locator: locator.into(),
            title: String::new(),
            artist: String::new(),
            duration: 0,
            audio_url: None,
            thumbnail: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_audio_url(mut self, audio_url: impl Into<String>) -> Self {
        self.audio_url = Some(audio_url.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Vrai si une URL audio jouable est connue
    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNKNOWN_TITLE
        } else {
            &self.title
        }
    }

    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            UNKNOWN_ARTIST
        } else {
            &self.artist
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracks_have_distinct_ids() {
        let a = Track::new("https://example.com/a");
        let b = Track::new("https://example.com/a");
        assert_ne!(a.id, b.id);
        assert_eq!(a.locator, b.locator);
    }

    #[test]
    fn test_display_fallbacks() {
        let track = Track::new("x");
        assert_eq!(track.display_title(), UNKNOWN_TITLE);
        assert_eq!(track.display_artist(), UNKNOWN_ARTIST);

        let track = track.with_title("Faded").with_artist("Alan Walker");
        assert_eq!(track.display_title(), "Faded");
        assert_eq!(track.display_artist(), "Alan Walker");
    }

    #[test]
    fn test_has_audio() {
        assert!(!Track::new("x").has_audio());
        assert!(!Track::new("x").with_audio_url("").has_audio());
        assert!(Track::new("x").with_audio_url("https://cdn/a.m4a").has_audio());
    }

    #[test]
    fn test_serialized_shape() {
        let track = Track::new("loc").with_title("T").with_duration(5);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["locator"], "loc");
        assert_eq!(json["duration"], 5);
        assert!(json["audio_url"].is_null());
    }
}
