//! Feeder : ajoute à la playlist les morceaux découverts par une source
//!
//! La source est interrogée sans aucun verrou ; le verrou du store n'est pris
//! que pour ajouter les nouveaux morceaux. Une erreur de la source est
//! journalisée puis retentée au tick suivant, elle n'arrête jamais la boucle.

use crate::state::RadioStateStore;
use pmoplaylist::Track;
use pmosource::{parse_filename, DiscoveredTrack, IngestionSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct IngestionFeeder {
    source: Arc<dyn IngestionSource>,
    store: Arc<RadioStateStore>,
    interval: Duration,
}

impl IngestionFeeder {
    pub fn new(
        source: Arc<dyn IngestionSource>,
        store: Arc<RadioStateStore>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    /// Lance la boucle d'interrogation dans une tâche tokio
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = self.interval.as_secs(), "Ingestion feeder started");

        loop {
            ticker.tick().await;
            self.poll_once().await;
        }
    }

    /// Une interrogation de la source ; retourne le nombre de morceaux ajoutés
    pub async fn poll_once(&self) -> usize {
        let discovered = match self.source.poll().await {
            Ok(discovered) => discovered,
            Err(e) => {
                warn!(transient = e.is_transient(), "Ingestion poll failed: {}", e);
                return 0;
            }
        };

        if discovered.is_empty() {
            debug!("No new tracks");
            return 0;
        }

        let tracks: Vec<Track> = discovered.into_iter().map(discovered_to_track).collect();
        let added = self.store.enqueue(tracks).await;
        info!(added, "New tracks added to playlist");
        added
    }
}

/// Morceau non résolu, avec les métadonnées tirées du nom de fichier
pub fn discovered_to_track(discovered: DiscoveredTrack) -> Track {
    let mut track = Track::new(discovered.locator);
    if let Some(filename) = discovered.filename_hint.as_deref() {
        let (artist, title) = parse_filename(filename);
        track.artist = artist;
        track.title = title;
    }
    if let Some(duration) = discovered.duration_hint {
        track.duration = duration;
    }
    track
}
