//! Rotator : avance de la playlist avec résolution de l'URL audio
//!
//! Le [`Rotator`] associe un [`AudioSourceResolver`] et un délai maximal.
//! Toute résolution passe par lui, de sorte qu'un resolver lent ne bloque
//! jamais plus longtemps que `timeout`.

use pmoplaylist::{Playlist, Track};
use pmosource::{AudioSourceResolver, ResolveError, ResolvedAudio, DEFAULT_DURATION_SECS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Rotator {
    resolver: Arc<dyn AudioSourceResolver>,
    timeout: Duration,
}

impl Rotator {
    pub fn new(resolver: Arc<dyn AudioSourceResolver>, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    pub fn resolver(&self) -> &Arc<dyn AudioSourceResolver> {
        &self.resolver
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Vrai si l'URL du morceau doit être (re)demandée avant lecture
    pub fn needs_resolution(&self, track: &Track) -> bool {
        self.resolver.refreshable() || !track.has_audio()
    }

    /// Résout un locator, un dépassement du délai étant un échec
    pub async fn resolve(&self, locator: &str) -> Result<ResolvedAudio, ResolveError> {
        match tokio::time::timeout(self.timeout, self.resolver.resolve(locator)).await {
            Ok(result) => result,
            Err(_) => Err(ResolveError::Timeout(self.timeout)),
        }
    }

    /// Résout et fusionne le résultat dans `track`
    ///
    /// En cas d'échec l'URL audio est effacée : elle a pu expirer.
    pub async fn refresh(&self, track: &mut Track) -> Result<(), ResolveError> {
        match self.resolve(&track.locator).await {
            Ok(audio) => {
                apply_resolution(track, audio);
                Ok(())
            }
            Err(e) => {
                track.audio_url = None;
                Err(e)
            }
        }
    }

    /// Passe au morceau suivant et prépare sa lecture
    ///
    /// Retourne le nouveau morceau courant, `None` si la playlist est vide.
    pub async fn advance(&self, playlist: &mut Playlist) -> Option<Track> {
        playlist.advance()?;
        self.prepare_current(playlist).await
    }

    /// Résout le morceau courant si nécessaire et met à jour la playlist
    ///
    /// Un échec n'empêche pas le morceau de devenir courant : il est joué
    /// sans URL audio.
    pub async fn prepare_current(&self, playlist: &mut Playlist) -> Option<Track> {
        let mut track = playlist.current()?.clone();

        if self.needs_resolution(&track) {
            debug!(track_id = %track.id, locator = %track.locator, "Resolving audio URL");
            if let Err(e) = self.refresh(&mut track).await {
                warn!(
                    track_id = %track.id,
                    locator = %track.locator,
                    transient = e.is_transient(),
                    "Audio resolution failed: {}",
                    e
                );
            }
            playlist.update_track(&track);
        }

        info!(
            title = track.display_title(),
            artist = track.display_artist(),
            duration = track.duration,
            "Now playing"
        );
        Some(track)
    }
}

/// Fusionne une résolution dans un morceau
///
/// L'URL audio, la durée et la vignette sont remplacées quand la source les
/// fournit ; le titre et l'artiste ne sont remplis que s'ils sont vides.
pub fn apply_resolution(track: &mut Track, audio: ResolvedAudio) {
    track.audio_url = Some(audio.audio_url);

    match audio.duration_secs.filter(|d| *d > 0) {
        Some(duration) => track.duration = duration,
        None if track.duration == 0 => track.duration = DEFAULT_DURATION_SECS,
        None => {}
    }

    if audio.thumbnail.is_some() {
        track.thumbnail = audio.thumbnail;
    }

    if track.title.is_empty() {
        if let Some(title) = audio.title.filter(|t| !t.trim().is_empty()) {
            track.title = title;
        }
    }
    if track.artist.is_empty() {
        if let Some(artist) = audio.artist.filter(|a| !a.trim().is_empty()) {
            track.artist = artist;
        }
    }
}
