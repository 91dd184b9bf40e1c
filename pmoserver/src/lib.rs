//! # pmoserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP de
//! PMORadio.
//!
//! ## Fonctionnalités
//!
//! - **API de haut niveau** : Interface simple au-dessus d'Axum
//! - **Server-Sent Events (SSE)** : Logs en temps réel via `/log-sse`
//! - **Documentation OpenAPI** : Swagger UI par API
//! - **CORS permissif et traces HTTP** : via `tower-http`
//! - **Arrêt gracieux** : sur Ctrl+C
//!
//! ## Architecture
//!
//! - [`server`] : Serveur principal et builder
//! - [`logs`] : Logs SSE, buffer circulaire et réglage du niveau
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmoserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_logging().await;
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, SseLayer, init_logging, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
