//! Outils partagés par les tests d'intégration

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pmoplaylist::{ManualClock, Track};
use pmoradio::{RadioConfig, RadioServerExt, RadioService};
use pmoserver::Server;
use pmosource::{AudioSourceResolver, ResolveError, ResolvedAudio};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Resolver à URLs expirantes ; les locators contenant `broken` échouent
#[derive(Debug, Default)]
pub struct ExpiringResolver {
    failing: Mutex<HashSet<String>>,
}

impl ExpiringResolver {
    pub fn fail_on(&self, locator: &str) {
        self.failing.lock().unwrap().insert(locator.to_string());
    }
}

#[async_trait]
impl AudioSourceResolver for ExpiringResolver {
    fn kind(&self) -> &'static str {
        "youtube"
    }

    fn refreshable(&self) -> bool {
        true
    }

    async fn resolve(&self, locator: &str) -> pmosource::Result<ResolvedAudio> {
        if locator.contains("broken") || self.failing.lock().unwrap().contains(locator) {
            return Err(ResolveError::NotFound(locator.to_string()));
        }
        Ok(ResolvedAudio {
            audio_url: format!("https://googlevideo.test/{}", locator),
            title: Some(format!("Video {}", locator)),
            artist: Some("Uploader".to_string()),
            duration_secs: None,
            thumbnail: Some(format!("https://i.ytimg.test/{}.jpg", locator)),
        })
    }
}

pub struct TestRadio {
    pub router: Router,
    pub service: Arc<RadioService>,
    pub clock: Arc<ManualClock>,
    pub resolver: Arc<ExpiringResolver>,
}

/// Radio montée sur un vrai `pmoserver::Server`, avec une horloge manuelle
pub async fn radio(config: RadioConfig, tracks: Vec<Track>) -> TestRadio {
    let clock = Arc::new(ManualClock::starting_now());
    let resolver = Arc::new(ExpiringResolver::default());
    let service = Arc::new(RadioService::with_clock(
        &config,
        resolver.clone(),
        clock.clone(),
    ));
    service.store().initialize(tracks).await;

    let mut server = Server::new("PMO-Radio-Test", "http://localhost:0", 0);
    server.init_radio(service.clone()).await.unwrap();

    TestRadio {
        router: server.router().await,
        service,
        clock,
        resolver,
    }
}

pub fn ordered_config() -> RadioConfig {
    RadioConfig {
        shuffle_on_start: false,
        ..Default::default()
    }
}

pub fn tracks(durations: &[u64]) -> Vec<Track> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Track::new(format!("song-{}", i + 1))
                .with_title(format!("Song {}", i + 1))
                .with_artist("Band")
                .with_duration(*d)
        })
        .collect()
}

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
