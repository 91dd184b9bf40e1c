//! Direct links
//!
//! The locator already is a permanent HTTP(S) link (static file, proxy link).
//! Nothing is fetched: the resolver only checks the scheme.

use crate::{AudioSourceResolver, ResolveError, ResolvedAudio, Result};
use async_trait::async_trait;

#[derive(Debug, Default, Clone)]
pub struct DirectResolver;

impl DirectResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioSourceResolver for DirectResolver {
    fn kind(&self) -> &'static str {
        "direct"
    }

    fn refreshable(&self) -> bool {
        false
    }

    async fn resolve(&self, locator: &str) -> Result<ResolvedAudio> {
        let locator = locator.trim();
        if locator.starts_with("http://") || locator.starts_with("https://") {
            Ok(ResolvedAudio::url_only(locator))
        } else {
            Err(ResolveError::InvalidLocator(locator.to_string()))
        }
    }
}
