use anyhow::Context;
use pmoconfig::get_config;
use pmoradio::{IngestionFeeder, RadioConfig, RadioConfigExt, RadioServerExt, RadioService, SourceKind};
use pmoserver::Server;
use pmosource::{AudioSourceResolver, DirectResolver, IngestionSource, TelegramSource, YtDlpResolver};
use std::sync::Arc;
use tracing::{info, warn};

/// Resolver et, pour Telegram, source d'ingestion
type Sources = (Arc<dyn AudioSourceResolver>, Option<Arc<dyn IngestionSource>>);

fn build_sources(radio: &RadioConfig) -> anyhow::Result<Sources> {
    match radio.source.kind {
        SourceKind::Youtube => {
            let resolver: Arc<dyn AudioSourceResolver> =
                Arc::new(YtDlpResolver::new(radio.source.ytdlp.binary.clone()));
            Ok((resolver, None))
        }
        SourceKind::Direct => {
            let resolver: Arc<dyn AudioSourceResolver> = Arc::new(DirectResolver::new());
            Ok((resolver, None))
        }
        SourceKind::Telegram => {
            let telegram = &radio.source.telegram;
            let source = Arc::new(
                TelegramSource::builder(telegram.bot_token.clone())
                    .api_base(telegram.api_base.clone())
                    .channel(telegram.channel.clone())
                    .build()
                    .context("Invalid Telegram configuration (radio.source.telegram)")?,
            );
            let resolver: Arc<dyn AudioSourceResolver> = source.clone();
            let ingestion: Arc<dyn IngestionSource> = source;
            Ok((resolver, Some(ingestion)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Serveur et logs ==========
    let config = get_config();
    let mut server = Server::new_configured();
    server.init_logging().await;

    // ========== PHASE 2 : Radio ==========
    let radio = config.get_radio_config()?;
    info!(
        station = %radio.name,
        source = %radio.source.kind,
        rotation = %radio.rotation,
        catch_up = %radio.catch_up,
        "📻 Starting radio"
    );

    let (resolver, ingestion) = build_sources(&radio)?;
    let service = Arc::new(RadioService::new(&radio, resolver));

    let initial = radio.initial_tracks();
    if initial.is_empty() {
        warn!("No initial playlist configured (radio.playlist), waiting for submissions");
    }
    service.store().initialize(initial).await;

    if let Some(source) = ingestion {
        IngestionFeeder::new(
            source,
            service.store().clone(),
            radio.source.telegram.poll_interval(),
        )
        .start();
    }

    server.init_radio(service).await?;
    server.add_redirect("/", "/swagger-ui/radio").await;

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ PMORadio is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
