//! # pmoradio - Radio partagée de PMORadio
//!
//! Cette crate assemble l'horloge et la rotation de `pmoplaylist` avec les
//! sources audio de `pmosource` pour former une radio : une playlist
//! commune, un morceau en cours identique pour tous les clients, et une
//! position recalculée à chaque requête.
//!
//! ## Architecture
//!
//! - [`state`] : [`RadioStateStore`], l'état partagé sous un seul mutex
//! - [`rotator`] : avance de la playlist avec résolution bornée dans le temps
//! - [`favorites`] : favori unique de la station
//! - [`share`] : liens de partage du morceau en cours
//! - [`feeder`] : ajout périodique des morceaux découverts par une source
//! - [`api`] / [`openapi`] : API REST `/api/radio` documentée avec utoipa
//! - [`config`] / [`config_ext`] : section `radio` de la configuration
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use pmoconfig::get_config;
//! use pmoradio::{RadioConfigExt, RadioServerExt, RadioService};
//! use pmoserver::ServerBuilder;
//! use pmosource::YtDlpResolver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let radio = get_config().get_radio_config()?;
//!     let resolver = Arc::new(YtDlpResolver::new(radio.source.ytdlp.binary.clone()));
//!
//!     let service = Arc::new(RadioService::new(&radio, resolver));
//!     service.store().initialize(radio.initial_tracks()).await;
//!
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_radio(service).await?;
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod config_ext;
pub mod error;
pub mod favorites;
pub mod feeder;
pub mod openapi;
pub mod pmoserver_ext;
pub mod rotator;
pub mod service;
pub mod share;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use api::create_api_router;
pub use config::{CatchUpPolicy, RadioConfig, SourceKind};
pub use config_ext::RadioConfigExt;
pub use error::{RadioError, Result};
pub use favorites::{Favorite, FavoriteStore, FavoriteStream};
pub use feeder::IngestionFeeder;
pub use openapi::RadioApiDoc;
pub use pmoserver_ext::RadioServerExt;
pub use rotator::{apply_resolution, Rotator};
pub use service::{RadioService, StationInfo};
pub use share::{share_info, ShareInfo};
pub use state::{PlaylistSnapshot, RadioSnapshot, RadioStateStore, StreamInfo};
