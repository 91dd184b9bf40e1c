//! PlaylistCore : file de rotation, morceau courant et historique

use super::RotationDiscipline;
use crate::history::{History, HistoryOrder};
use crate::Track;
use std::collections::VecDeque;

/// Configuration d'une playlist
#[derive(Debug, Clone)]
pub struct PlaylistConfig {
    pub rotation: RotationDiscipline,
    pub history_capacity: usize,
    pub history_order: HistoryOrder,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            rotation: RotationDiscipline::default(),
            history_capacity: 5,
            history_order: HistoryOrder::default(),
        }
    }
}

/// Noyau de la playlist
///
/// En rotation cyclique, `queue` n'est jamais réordonnée par la lecture.
/// En rotation en queue, le morceau courant est toujours le dernier élément.
#[derive(Debug, Clone)]
pub struct PlaylistCore {
    pub queue: VecDeque<Track>,
    pub current: Option<Track>,
    pub history: History,
    pub config: PlaylistConfig,
}

impl PlaylistCore {
    pub fn new(config: PlaylistConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            current: None,
            history: History::new(config.history_capacity, config.history_order),
            config,
        }
    }

    /// Position du morceau courant dans la file (par identité)
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }

    /// Indice du premier morceau que la rotation choisirait
    pub fn next_index(&self) -> usize {
        match self.config.rotation {
            RotationDiscipline::RotateToTail => 0,
            RotationDiscipline::Cyclic => match self.current_index() {
                Some(idx) => (idx + 1) % self.queue.len(),
                None => 0,
            },
        }
    }

    /// Remplace un morceau (par identité) dans la file et comme courant
    pub fn replace(&mut self, track: &Track) -> bool {
        let mut found = false;
        for slot in self.queue.iter_mut().filter(|t| t.id == track.id) {
            *slot = track.clone();
            found = true;
        }
        if let Some(current) = self.current.as_mut() {
            if current.id == track.id {
                *current = track.clone();
                found = true;
            }
        }
        found
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.current = None;
        self.history.clear();
    }
}
