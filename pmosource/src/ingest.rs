//! Ingestion: discovery of new tracks from an external source

use crate::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// A track found by an ingestion source, not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredTrack {
    /// Locator understood by the matching resolver
    pub locator: String,
    /// Original file name, parsed with [`crate::parse_filename`]
    pub filename_hint: Option<String>,
    pub duration_hint: Option<u64>,
}

/// Append-only source of newly discovered tracks
///
/// Each call to [`IngestionSource::poll`] returns only what appeared since
/// the previous call.
#[async_trait]
pub trait IngestionSource: Debug + Send + Sync {
    async fn poll(&self) -> Result<Vec<DiscoveredTrack>>;
}
