//! Moteur de rotation de la playlist

pub mod core;

use self::core::{PlaylistConfig, PlaylistCore};
use crate::{History, Track};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Discipline de rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDiscipline {
    /// Ordre fixe, `(index courant + 1) mod len`
    Cyclic,
    /// La tête de file devient courante et repart en queue
    #[default]
    RotateToTail,
}

impl RotationDiscipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationDiscipline::Cyclic => "cyclic",
            RotationDiscipline::RotateToTail => "rotate_to_tail",
        }
    }
}

impl fmt::Display for RotationDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playlist tournante : file, morceau courant et historique
///
/// Structure purement synchrone, sans verrou. Le partage entre tâches est
/// assuré par le propriétaire (`pmoradio::RadioStateStore`).
#[derive(Debug, Clone)]
pub struct Playlist {
    core: PlaylistCore,
}

impl Playlist {
    pub fn new(config: PlaylistConfig) -> Self {
        Self {
            core: PlaylistCore::new(config),
        }
    }

    /// Ajoute un morceau en fin de file
    pub fn push(&mut self, track: Track) {
        self.core.queue.push_back(track);
    }

    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.core.queue.extend(tracks);
    }

    pub fn len(&self) -> usize {
        self.core.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.queue.is_empty()
    }

    /// Snapshot de la file dans son ordre courant
    pub fn tracks(&self) -> Vec<Track> {
        self.core.queue.iter().cloned().collect()
    }

    pub fn current(&self) -> Option<&Track> {
        self.core.current.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.core.history
    }

    pub fn discipline(&self) -> RotationDiscipline {
        self.core.config.rotation
    }

    /// Mélange la file (utilisé une seule fois au démarrage)
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.core.queue.make_contiguous().shuffle(rng);
    }

    /// Passe au morceau suivant
    ///
    /// Le morceau courant (s'il existe) entre dans l'historique. Retourne le
    /// nouveau morceau courant, ou `None` si la file est vide.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.core.queue.is_empty() {
            return None;
        }

        let next = match self.core.config.rotation {
            RotationDiscipline::Cyclic => {
                let idx = self.core.next_index();
                self.core.queue[idx].clone()
            }
            RotationDiscipline::RotateToTail => {
                let head = self.core.queue.pop_front()?;
                self.core.queue.push_back(head.clone());
                head
            }
        };

        let rotation = self.core.config.rotation;
        if let Some(previous) = self.core.current.replace(next) {
            debug!(%rotation, track_id = %previous.id, "Track moved to history");
            self.core.history.push(previous);
        }

        let current = self.core.current.as_ref()?;
        debug!(
            %rotation,
            track_id = %current.id,
            title = %current.title,
            queue_len = self.core.queue.len(),
            "Playlist advanced"
        );
        Some(current)
    }

    /// Les `n` prochains morceaux dans l'ordre de rotation, sans rien modifier
    ///
    /// Boucle sur la file : peut contenir le morceau courant quand `n`
    /// atteint la taille de la playlist.
    pub fn upcoming(&self, n: usize) -> Vec<Track> {
        let len = self.core.queue.len();
        if len == 0 {
            return Vec::new();
        }
        let start = self.core.next_index();
        (0..n)
            .map(|i| self.core.queue[(start + i) % len].clone())
            .collect()
    }

    /// Remplace un morceau (par identité) partout où il apparaît
    pub fn update_track(&mut self, track: &Track) -> bool {
        self.core.replace(track)
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }
}
