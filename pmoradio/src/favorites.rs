//! FavoriteStore : un seul favori global
//!
//! Le favori est une copie du morceau au moment de l'enregistrement. Pour les
//! sources dont les URLs expirent, l'URL est redemandée à chaque lecture du
//! favori ; la résolution se fait hors du verrou.

use crate::error::{RadioError, Result};
use crate::rotator::Rotator;
use chrono::{DateTime, Utc};
use pmoplaylist::{Clock, Track};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Favorite {
    pub track: Track,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteStream {
    pub audio_url: String,
    pub track: Track,
}

#[derive(Debug)]
pub struct FavoriteStore {
    slot: RwLock<Option<Favorite>>,
    rotator: Rotator,
    clock: Arc<dyn Clock>,
}

impl FavoriteStore {
    pub fn new(rotator: Rotator, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            rotator,
            clock,
        }
    }

    /// Remplace le favori par une copie de `track`
    pub async fn save(&self, track: &Track) -> Favorite {
        let favorite = Favorite {
            track: track.clone(),
            saved_at: self.clock.now(),
        };
        *self.slot.write().await = Some(favorite.clone());
        info!(
            title = track.display_title(),
            artist = track.display_artist(),
            "Favorite saved"
        );
        favorite
    }

    pub async fn get(&self) -> Result<Favorite> {
        self.slot.read().await.clone().ok_or(RadioError::NoFavorite)
    }

    /// URL jouable du favori
    ///
    /// Resolvers à URLs expirantes : toujours résolu à nouveau. Liens
    /// permanents : l'URL enregistrée est rendue telle quelle, et n'est
    /// résolue que si elle manque.
    pub async fn stream_url(&self) -> Result<FavoriteStream> {
        let favorite = self.get().await?;
        let mut track = favorite.track.clone();

        if self.rotator.needs_resolution(&track) {
            match self.rotator.refresh(&mut track).await {
                Ok(()) => self.write_back(&favorite, &track).await,
                Err(e) => warn!(track_id = %track.id, "Favorite resolution failed: {}", e),
            }
        }

        let audio_url = track
            .audio_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RadioError::AudioUnavailable(track.id.clone()))?;

        Ok(FavoriteStream { audio_url, track })
    }

    /// Reporte l'URL et la durée dans le favori, sauf s'il a été remplacé
    async fn write_back(&self, resolved_from: &Favorite, track: &Track) {
        let mut slot = self.slot.write().await;
        if let Some(stored) = slot.as_mut() {
            if stored.track.id == resolved_from.track.id
                && stored.saved_at == resolved_from.saved_at
            {
                stored.track.audio_url = track.audio_url.clone();
                stored.track.duration = track.duration;
            }
        }
    }
}
