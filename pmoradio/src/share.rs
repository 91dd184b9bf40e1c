//! Métadonnées de partage du morceau en cours

use pmoplaylist::Track;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ShareInfo {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub track: Track,
}

/// Construit le lien et le texte de partage d'un morceau
pub fn share_info(track: &Track, station_name: &str, base_url: &str) -> ShareInfo {
    ShareInfo {
        url: format!("{}/?track={}", base_url.trim_end_matches('/'), track.id),
        title: format!("🎸 {} - {}", track.display_title(), track.display_artist()),
        description: format!("Now playing on {}", station_name),
        image: track.thumbnail.clone(),
        track: track.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_info() {
        let track = Track::new("loc")
            .with_title("Highway to Hell")
            .with_artist("AC/DC")
            .with_thumbnail("https://img.test/1.jpg");
        let share = share_info(&track, "Madrid Rock Radio", "https://madridrock.radio/");

        assert_eq!(share.url, format!("https://madridrock.radio/?track={}", track.id));
        assert_eq!(share.title, "🎸 Highway to Hell - AC/DC");
        assert_eq!(share.description, "Now playing on Madrid Rock Radio");
        assert_eq!(share.image.as_deref(), Some("https://img.test/1.jpg"));
    }

    #[test]
    fn test_missing_metadata() {
        let share = share_info(&Track::new("loc"), "X", "https://x.test");
        assert_eq!(share.title, "🎸 Unknown Track - Unknown Artist");
        assert!(share.image.is_none());
    }
}
