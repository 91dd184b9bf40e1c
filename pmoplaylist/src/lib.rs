//! # pmoplaylist - Moteur de rotation de playlist et horloge de lecture partagée
//!
//! Cette crate fournit le cœur déterministe de la radio :
//! - Une horloge de lecture dérivée (jamais stockée) à partir d'un instant de départ
//! - Deux disciplines de rotation explicites (cyclique ou rotation en queue)
//! - Un historique borné des morceaux joués
//! - Une prévisualisation pure des prochains morceaux
//!
//! Aucune entrée/sortie ici : la résolution des URLs audio et le verrouillage
//! de l'état partagé sont la responsabilité de `pmoradio`.
//!
//! # Architecture
//!
//! - **Clock** : source du temps (système ou manuelle pour les tests)
//! - **Track** : un morceau (locator, métadonnées, URL audio résolue)
//! - **History** : historique borné, ordonné selon [`HistoryOrder`]
//! - **Playlist** : file de rotation + morceau courant + historique
//!
//! # Exemple d'utilisation
//!
//! ```
//! use pmoplaylist::{Playlist, PlaylistConfig, RotationDiscipline, Track};
//!
//! let mut playlist = Playlist::new(PlaylistConfig {
//!     rotation: RotationDiscipline::RotateToTail,
//!     history_capacity: 2,
//!     ..PlaylistConfig::default()
//! });
//! playlist.push(Track::new("a").with_duration(10));
//! playlist.push(Track::new("b").with_duration(20));
//!
//! let first = playlist.advance().map(|t| t.locator.clone());
//! assert_eq!(first.as_deref(), Some("a"));
//! assert_eq!(playlist.upcoming(1)[0].locator, "b");
//! ```

pub mod clock;
mod history;
mod playlist;
mod track;

// Réexports publics
pub use clock::{elapsed_secs, is_finished, Clock, ManualClock, PositionMode, SystemClock};
pub use history::{History, HistoryOrder};
pub use playlist::core::PlaylistConfig;
pub use playlist::{Playlist, RotationDiscipline};
pub use track::{Track, UNKNOWN_ARTIST, UNKNOWN_TITLE};
