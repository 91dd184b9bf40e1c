//! RadioService : ce que l'API REST manipule
//!
//! Regroupe le store, le favori et l'identité de la station. Partagé entre
//! les handlers sous forme d'`Arc<RadioService>`.

use crate::config::RadioConfig;
use crate::error::Result;
use crate::favorites::{Favorite, FavoriteStore};
use crate::share::{share_info, ShareInfo};
use crate::state::RadioStateStore;
use pmoplaylist::{Clock, RotationDiscipline, SystemClock};
use pmosource::AudioSourceResolver;
use serde::Serialize;
use std::sync::Arc;

/// Identité de la station
#[derive(Debug, Clone, Serialize)]
pub struct StationInfo {
    pub name: String,
    pub source_kind: String,
    pub rotation: RotationDiscipline,
    pub playlist_count: usize,
}

#[derive(Debug)]
pub struct RadioService {
    store: Arc<RadioStateStore>,
    favorites: FavoriteStore,
    name: String,
    share_base_url: String,
    rotation: RotationDiscipline,
}

impl RadioService {
    pub fn new(config: &RadioConfig, resolver: Arc<dyn AudioSourceResolver>) -> Self {
        Self::with_clock(config, resolver, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &RadioConfig,
        resolver: Arc<dyn AudioSourceResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = RadioStateStore::with_clock(config, resolver, clock.clone());
        let favorites = FavoriteStore::new(store.rotator().clone(), clock);
        Self {
            store: Arc::new(store),
            favorites,
            name: config.name.clone(),
            share_base_url: config.share_base_url.clone(),
            rotation: config.rotation,
        }
    }

    pub fn store(&self) -> &Arc<RadioStateStore> {
        &self.store
    }

    pub fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enregistre le morceau en cours comme favori
    pub async fn save_current_favorite(&self) -> Result<Favorite> {
        let track = self.store.current_track().await?;
        Ok(self.favorites.save(&track).await)
    }

    pub async fn share_current(&self) -> Result<ShareInfo> {
        let track = self.store.current_track().await?;
        Ok(share_info(&track, &self.name, &self.share_base_url))
    }

    pub async fn info(&self) -> StationInfo {
        StationInfo {
            name: self.name.clone(),
            source_kind: self.store.rotator().resolver().kind().to_string(),
            rotation: self.rotation,
            playlist_count: self.store.playlist_len().await,
        }
    }
}
