//! Extension de `pmoserver::Server` pour l'API radio
//!
//! `pmoradio` ajoute ses routes au serveur sans que `pmoserver` connaisse
//! `pmoradio`.
//!
//! ```rust,no_run
//! use pmoradio::{RadioConfig, RadioServerExt, RadioService};
//! use pmoserver::ServerBuilder;
//! use pmosource::DirectResolver;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut server = ServerBuilder::new_configured().build();
//! let service = Arc::new(RadioService::new(
//!     &RadioConfig::default(),
//!     Arc::new(DirectResolver::new()),
//! ));
//!
//! server.init_radio(service).await?;
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use crate::api::create_api_router;
use crate::openapi::RadioApiDoc;
use crate::service::RadioService;
use anyhow::Result;
use pmoserver::Server;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

/// Trait d'extension pour monter l'API radio sur un serveur
pub trait RadioServerExt {
    /// Monte l'API sous `/api/radio` avec sa documentation
    /// (`/swagger-ui/radio`, `/api-docs/radio.json`)
    async fn init_radio(&mut self, service: Arc<RadioService>) -> Result<Arc<RadioService>>;
}

impl RadioServerExt for Server {
    async fn init_radio(&mut self, service: Arc<RadioService>) -> Result<Arc<RadioService>> {
        info!("Initializing radio API...");

        let router = create_api_router(service.clone());
        self.add_openapi(router, RadioApiDoc::openapi(), "radio").await;

        info!(station = service.name(), "Radio API available at /api/radio/*");
        Ok(service)
    }
}
