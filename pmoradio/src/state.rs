//! RadioStateStore : l'état partagé de la radio
//!
//! Un seul enregistrement mutable, protégé par un mutex tokio, lu et modifié
//! par toutes les requêtes. La position n'est jamais stockée : chaque lecture
//! la recalcule depuis `started_at`, et passe au morceau suivant quand le
//! morceau courant est terminé. Il n'y a aucune tâche de fond qui fasse
//! avancer la lecture.
//!
//! Deux lectures concurrentes ne peuvent pas avancer deux fois : la
//! détection de fin et l'avance se font sous le même verrou.

use crate::config::{CatchUpPolicy, RadioConfig};
use crate::error::{RadioError, Result};
use crate::rotator::Rotator;
use chrono::{DateTime, TimeDelta, Utc};
use pmoplaylist::{
    elapsed_secs, is_finished, Clock, Playlist, PositionMode, SystemClock, Track,
};
use pmosource::{AudioSourceResolver, DEFAULT_DURATION_SECS};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct RadioState {
    playlist: Playlist,
    started_at: Option<DateTime<Utc>>,
    is_playing: bool,
}

#[derive(Debug, Clone)]
struct StoreSettings {
    catch_up: CatchUpPolicy,
    position_mode: PositionMode,
    upcoming_count: usize,
    shuffle_on_start: bool,
}

impl From<&RadioConfig> for StoreSettings {
    fn from(config: &RadioConfig) -> Self {
        Self {
            catch_up: config.catch_up,
            position_mode: config.position_mode,
            upcoming_count: config.upcoming_count,
            shuffle_on_start: config.shuffle_on_start,
        }
    }
}

/// Instantané de l'état de la radio
#[derive(Debug, Clone, Serialize)]
pub struct RadioSnapshot {
    pub current_track: Option<Track>,
    /// Secondes écoulées dans le morceau courant
    pub position: f64,
    pub is_playing: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub playlist_count: usize,
    pub just_played: Option<Track>,
    pub up_next: Vec<Track>,
    pub history: Vec<Track>,
}

/// Ce qu'il faut à un client pour rejoindre la diffusion
#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    pub audio_url: String,
    pub position: f64,
    pub track: Track,
}

/// Contenu de la file, sans effet sur la lecture
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSnapshot {
    pub tracks: Vec<Track>,
    pub current_id: Option<String>,
}

#[derive(Debug)]
pub struct RadioStateStore {
    inner: Mutex<RadioState>,
    rotator: Rotator,
    clock: Arc<dyn Clock>,
    settings: StoreSettings,
}

impl RadioStateStore {
    pub fn new(config: &RadioConfig, resolver: Arc<dyn AudioSourceResolver>) -> Self {
        Self::with_clock(config, resolver, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &RadioConfig,
        resolver: Arc<dyn AudioSourceResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Mutex::new(RadioState {
                playlist: Playlist::new(config.playlist_config()),
                started_at: None,
                is_playing: false,
            }),
            rotator: Rotator::new(resolver, config.resolver.timeout()),
            clock,
            settings: StoreSettings::from(config),
        }
    }

    pub fn rotator(&self) -> &Rotator {
        &self.rotator
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Charge la playlist de départ et lance la lecture
    ///
    /// Remplace le contenu existant. La file est mélangée une fois si
    /// `shuffle_on_start` est actif.
    pub async fn initialize(&self, tracks: Vec<Track>) -> Option<Track> {
        let mut state = self.inner.lock().await;
        state.playlist.clear();
        state.playlist.extend(tracks);
        if self.settings.shuffle_on_start {
            state.playlist.shuffle(&mut rand::rng());
        }
        info!(
            tracks = state.playlist.len(),
            rotation = %state.playlist.discipline(),
            "Radio playlist initialized"
        );
        self.start_next(&mut state).await
    }

    /// État courant, après avoir fait avancer la rotation si besoin
    pub async fn state(&self) -> RadioSnapshot {
        let mut state = self.inner.lock().await;
        let now = self.clock.now();
        self.sync(&mut state, now).await;
        self.snapshot(&state)
    }

    /// URL audio et position du morceau courant
    ///
    /// Un morceau sans URL est résolu une fois de plus avant d'abandonner.
    pub async fn stream(&self) -> Result<StreamInfo> {
        let mut state = self.inner.lock().await;
        let now = self.clock.now();
        self.sync(&mut state, now).await;

        let mut track = state
            .playlist
            .current()
            .cloned()
            .ok_or(RadioError::NotPlaying)?;

        if !track.has_audio() {
            debug!(track_id = %track.id, "Current track has no audio URL, retrying resolution");
            match self.rotator.refresh(&mut track).await {
                Ok(()) => {
                    state.playlist.update_track(&track);
                }
                Err(e) => warn!(track_id = %track.id, "Audio still unavailable: {}", e),
            }
        }

        let audio_url = track
            .audio_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RadioError::AudioUnavailable(track.id.clone()))?;

        Ok(StreamInfo {
            audio_url,
            position: self.position(&state, &track),
            track,
        })
    }

    /// Contenu de la file dans l'ordre de stockage
    pub async fn playlist(&self) -> PlaylistSnapshot {
        let state = self.inner.lock().await;
        PlaylistSnapshot {
            tracks: state.playlist.tracks(),
            current_id: state.playlist.current().map(|t| t.id.clone()),
        }
    }

    /// Ajoute un morceau soumis par un client
    ///
    /// Le morceau est résolu avant de prendre le verrou ; un échec laisse la
    /// playlist intacte. Si rien n'est en cours de lecture, la lecture
    /// démarre.
    pub async fn submit(
        &self,
        locator: &str,
        title: Option<String>,
        artist: Option<String>,
    ) -> Result<Track> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(RadioError::InvalidRequest(
                "locator must not be empty".to_string(),
            ));
        }

        let mut track = Track::new(locator);
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            track.title = title;
        }
        if let Some(artist) = artist.filter(|a| !a.trim().is_empty()) {
            track.artist = artist;
        }

        if let Err(e) = self.rotator.refresh(&mut track).await {
            warn!(locator = %locator, "Submission rejected: {}", e);
            return Err(e.into());
        }

        let mut state = self.inner.lock().await;
        state.playlist.push(track.clone());
        info!(
            title = track.display_title(),
            artist = track.display_artist(),
            "Track added to playlist"
        );

        if state.playlist.current().is_none() {
            self.start_idle(&mut state, &track.id).await;
        }

        Ok(track)
    }

    /// Ajoute des morceaux non résolus (ingestion) et démarre si inactif
    pub async fn enqueue(&self, tracks: Vec<Track>) -> usize {
        if tracks.is_empty() {
            return 0;
        }
        let count = tracks.len();
        let mut state = self.inner.lock().await;
        state.playlist.extend(tracks);
        if state.playlist.current().is_none() {
            self.start_next(&mut state).await;
        }
        count
    }

    /// Passe au morceau suivant sans regarder le temps écoulé
    pub async fn force_next(&self) -> RadioSnapshot {
        let mut state = self.inner.lock().await;
        self.start_next(&mut state).await;
        self.snapshot(&state)
    }

    /// Morceau en cours, après avoir fait avancer la rotation si besoin
    pub async fn current_track(&self) -> Result<Track> {
        let mut state = self.inner.lock().await;
        let now = self.clock.now();
        self.sync(&mut state, now).await;
        state
            .playlist
            .current()
            .cloned()
            .ok_or(RadioError::NotPlaying)
    }

    pub async fn playlist_len(&self) -> usize {
        self.inner.lock().await.playlist.len()
    }

    /// Avance et remet l'horloge à zéro
    async fn start_next(&self, state: &mut RadioState) -> Option<Track> {
        let current = self.rotator.advance(&mut state.playlist).await;
        self.restart_clock(state, current.is_some());
        current
    }

    /// Démarre la lecture depuis l'état inactif
    ///
    /// `resolved_id` désigne un morceau qui vient d'être résolu : inutile de
    /// le résoudre à nouveau s'il devient le morceau courant.
    async fn start_idle(&self, state: &mut RadioState, resolved_id: &str) {
        let is_resolved = state
            .playlist
            .advance()
            .is_some_and(|current| current.id == resolved_id);
        if !is_resolved {
            self.rotator.prepare_current(&mut state.playlist).await;
        }
        let playing = state.playlist.current().is_some();
        self.restart_clock(state, playing);
    }

    fn restart_clock(&self, state: &mut RadioState, playing: bool) {
        state.started_at = playing.then(|| self.clock.now());
        state.is_playing = playing;
    }

    /// Fait avancer la rotation si le morceau courant est terminé à `now`
    async fn sync(&self, state: &mut RadioState, now: DateTime<Utc>) {
        let Some(current) = state.playlist.current() else {
            return;
        };
        let Some(started_at) = state.started_at else {
            // Morceau courant sans horloge : on la démarre maintenant
            state.started_at = Some(now);
            state.is_playing = true;
            return;
        };

        let duration = match self.settings.catch_up {
            CatchUpPolicy::SingleStep => current.duration,
            CatchUpPolicy::Timeline => timeline_duration(current),
        };
        let elapsed = elapsed_secs(started_at, now);
        if !is_finished(elapsed, duration) {
            return;
        }

        debug!(
            track_id = %current.id,
            elapsed,
            duration,
            "Track finished"
        );

        match self.settings.catch_up {
            CatchUpPolicy::SingleStep => {
                self.start_next(state).await;
            }
            CatchUpPolicy::Timeline => self.catch_up(state, started_at, now).await,
        }
    }

    /// Rattrape tous les morceaux écoulés depuis `started_at`
    ///
    /// Au plus un tour complet de la file ; au-delà l'horloge repart de
    /// `now`. Seul le morceau finalement retenu est résolu.
    async fn catch_up(&self, state: &mut RadioState, started_at: DateTime<Utc>, now: DateTime<Utc>) {
        let bound = state.playlist.len();
        let mut clock_start = started_at;
        let mut skipped = 0;

        while let Some(current) = state.playlist.current() {
            let duration = timeline_duration(current);
            if !is_finished(elapsed_secs(clock_start, now), duration) {
                break;
            }
            if skipped == bound {
                clock_start = now;
                break;
            }
            clock_start += TimeDelta::seconds(duration as i64);
            state.playlist.advance();
            skipped += 1;
        }

        if skipped > 0 {
            debug!(skipped, "Caught up with the playback timeline");
            self.rotator.prepare_current(&mut state.playlist).await;
        }
        state.started_at = Some(clock_start);
        state.is_playing = state.playlist.current().is_some();
    }

    fn position(&self, state: &RadioState, track: &Track) -> f64 {
        match state.started_at {
            Some(started_at) => self
                .settings
                .position_mode
                .position(elapsed_secs(started_at, self.clock.now()), track.duration),
            None => 0.0,
        }
    }

    fn snapshot(&self, state: &RadioState) -> RadioSnapshot {
        let history = state.playlist.history();
        let current = state.playlist.current().cloned();
        let position = current
            .as_ref()
            .map(|track| self.position(state, track))
            .unwrap_or(0.0);

        RadioSnapshot {
            position,
            is_playing: state.is_playing && current.is_some(),
            started_at: state.started_at,
            playlist_count: state.playlist.len(),
            just_played: history.last_played().cloned(),
            up_next: state.playlist.upcoming(self.settings.upcoming_count),
            history: history.entries(),
            current_track: current,
        }
    }
}

/// Durée retenue pour la timeline ; un morceau jamais résolu compte pour
/// la durée par défaut plutôt que pour une seconde
fn timeline_duration(track: &Track) -> u64 {
    match track.duration {
        0 => DEFAULT_DURATION_SECS,
        duration => duration,
    }
}
