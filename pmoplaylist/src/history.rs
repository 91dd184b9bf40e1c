//! Historique borné des morceaux joués

use crate::Track;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Côté d'insertion dans l'historique
///
/// Dans les deux cas l'entrée la plus ancienne est évincée quand la capacité
/// est dépassée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Insertion en tête : l'entrée 0 est le dernier morceau joué
    #[default]
    NewestFirst,
    /// Ajout en queue : la dernière entrée est le dernier morceau joué
    OldestFirst,
}

impl HistoryOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryOrder::NewestFirst => "newest_first",
            HistoryOrder::OldestFirst => "oldest_first",
        }
    }
}

impl fmt::Display for HistoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Historique à capacité fixe
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Track>,
    capacity: usize,
    order: HistoryOrder,
}

impl History {
    pub fn new(capacity: usize, order: HistoryOrder) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            order,
        }
    }

    /// Enregistre un morceau joué et évince les plus anciens
    pub fn push(&mut self, track: Track) {
        if self.capacity == 0 {
            return;
        }
        match self.order {
            HistoryOrder::NewestFirst => self.entries.push_front(track),
            HistoryOrder::OldestFirst => self.entries.push_back(track),
        }
        self.evict();
    }

    fn evict(&mut self) {
        while self.entries.len() > self.capacity {
            match self.order {
                HistoryOrder::NewestFirst => self.entries.pop_back(),
                HistoryOrder::OldestFirst => self.entries.pop_front(),
            };
        }
    }

    /// Dernier morceau joué
    pub fn last_played(&self) -> Option<&Track> {
        match self.order {
            HistoryOrder::NewestFirst => self.entries.front(),
            HistoryOrder::OldestFirst => self.entries.back(),
        }
    }

    /// Entrées dans l'ordre de stockage (celui de [`HistoryOrder`])
    pub fn entries(&self) -> Vec<Track> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
