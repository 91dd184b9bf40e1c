//! File name to (artist, title) convention
//!
//! `"03 - Artist - Title.mp3"` gives `("Artist", "Title")`.

use once_cell::sync::Lazy;
use regex::Regex;

const UNKNOWN_ARTIST: &str = "Unknown Artist";

static TRACK_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\s*[-._)]\s*|\s+)").expect("valid track number regex"));

/// Parse a file name into `(artist, title)`
///
/// Strips the extension and a leading track number, then splits on the first
/// `" - "`, or else on the first `"-"`. Without separator the artist is
/// `"Unknown Artist"`.
pub fn parse_filename(filename: &str) -> (String, String) {
    let stem = strip_extension(filename.trim());
    let stem = strip_track_number(stem);

    let split = stem
        .split_once(" - ")
        .or_else(|| stem.split_once('-'));

    match split {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            (artist.trim().to_string(), title.trim().to_string())
        }
        _ => (UNKNOWN_ARTIST.to_string(), stem.trim().to_string()),
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => name,
    }
}

fn strip_track_number(stem: &str) -> &str {
    match TRACK_NUMBER.find(stem) {
        // Un titre purement numérique reste intact
        Some(m) if m.end() < stem.len() => &stem[m.end()..],
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(name: &str) -> (String, String) {
        parse_filename(name)
    }

    #[test]
    fn test_artist_and_title() {
        assert_eq!(
            parsed("Metallica - Enter Sandman.mp3"),
            ("Metallica".into(), "Enter Sandman".into())
        );
    }

    #[test]
    fn test_track_number_prefix() {
        assert_eq!(
            parsed("03 - AC-DC - Thunderstruck.flac"),
            ("AC-DC".into(), "Thunderstruck".into())
        );
        assert_eq!(
            parsed("7. Queen - Bohemian Rhapsody.m4a"),
            ("Queen".into(), "Bohemian Rhapsody".into())
        );
    }

    #[test]
    fn test_dash_without_spaces() {
        assert_eq!(
            parsed("Nirvana-Lithium.ogg"),
            ("Nirvana".into(), "Lithium".into())
        );
    }

    #[test]
    fn test_no_separator() {
        assert_eq!(
            parsed("Untitled jam.wav"),
            ("Unknown Artist".into(), "Untitled jam".into())
        );
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(
            parsed("Daft Punk - Around the World"),
            ("Daft Punk".into(), "Around the World".into())
        );
    }

    #[test]
    fn test_numeric_only_title_is_kept() {
        assert_eq!(parsed("1999.mp3"), ("Unknown Artist".into(), "1999".into()));
    }
}
