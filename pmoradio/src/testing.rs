//! Resolver factice pour les tests unitaires

use async_trait::async_trait;
use pmosource::{AudioSourceResolver, ResolveError, ResolvedAudio};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct StubResolver {
    refreshable: bool,
    delay: Option<Duration>,
    duration_secs: Option<u64>,
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl StubResolver {
    /// URLs qui expirent
    pub fn refreshable() -> Self {
        Self {
            refreshable: true,
            ..Default::default()
        }
    }

    /// Liens permanents
    pub fn permanent() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_duration(mut self, secs: u64) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    pub fn fail_on(&self, locator: &str) {
        self.failing.lock().unwrap().insert(locator.to_string());
    }

    pub fn heal(&self, locator: &str) {
        self.failing.lock().unwrap().remove(locator);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSourceResolver for StubResolver {
    fn kind(&self) -> &'static str {
        "stub"
    }

    fn refreshable(&self) -> bool {
        self.refreshable
    }

    async fn resolve(&self, locator: &str) -> pmosource::Result<ResolvedAudio> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(locator) {
            return Err(ResolveError::NotFound(locator.to_string()));
        }
        Ok(ResolvedAudio {
            audio_url: format!("https://cdn.test/{}?v={}", locator, n),
            title: Some(format!("Title of {}", locator)),
            artist: Some("Stub Artist".to_string()),
            duration_secs: self.duration_secs,
            thumbnail: None,
        })
    }
}
