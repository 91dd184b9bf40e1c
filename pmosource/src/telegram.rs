//! Telegram Bot API source
//!
//! One client plays both roles:
//! - ingestion: `getUpdates` on the bot, keeping audio files posted to the
//!   configured channel (or to any chat when no channel is configured);
//! - resolution: `getFile` turns a `tg:<file_id>` locator into a download
//!   URL. Those URLs stay valid for about an hour, so the source is
//!   `refreshable`.

use crate::ingest::{DiscoveredTrack, IngestionSource};
use crate::{AudioSourceResolver, ResolveError, ResolvedAudio, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Bot API base URL
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Locator prefix for Telegram files
pub const LOCATOR_PREFIX: &str = "tg:";

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "ogg", "oga", "opus", "flac", "wav", "aac"];

/// Telegram bot client (ingestion + resolver)
pub struct TelegramSource {
    client: Client,
    api_base: String,
    token: String,
    channel: Option<String>,
    offset: AtomicI64,
}

impl std::fmt::Debug for TelegramSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSource")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("channel", &self.channel)
            .finish()
    }
}

// ============================================================================
// Bot API payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
    channel_post: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    audio: Option<Audio>,
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Audio {
    file_id: String,
    duration: Option<u64>,
    file_name: Option<String>,
    title: Option<String>,
    performer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Document {
    file_id: String,
    file_name: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct File {
    file_path: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

impl TelegramSource {
    /// Create a builder for configuring the client
    pub fn builder(token: impl Into<String>) -> TelegramSourceBuilder {
        TelegramSourceBuilder::new(token)
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Next `getUpdates` offset
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::Acquire)
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self
            .client
            .get(self.method_url(method))
            .query(query)
            .send()
            .await?;

        // L'API renvoie un corps JSON `ok: false` même en cas d'erreur HTTP
        let status = response.status();
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ResolveError::Network(format!("{method}: HTTP {status}: {e}")))?;

        match (body.ok, body.result) {
            (true, Some(result)) => Ok(result),
            _ => {
                let description = body
                    .description
                    .unwrap_or_else(|| format!("{method} failed with HTTP {status}"));
                Err(match body.error_code {
                    Some(400) | Some(404) => ResolveError::NotFound(description),
                    _ => ResolveError::Network(description),
                })
            }
        }
    }

    /// Does this chat match the configured channel?
    fn accepts_chat(&self, chat: &Chat) -> bool {
        let Some(channel) = self.channel.as_deref() else {
            return true;
        };
        let wanted = channel.trim_start_matches('@');
        chat.id.to_string() == wanted
            || chat
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(wanted))
    }

    fn discovered(message: Message) -> Option<DiscoveredTrack> {
        if let Some(audio) = message.audio {
            let filename_hint = audio.file_name.or_else(|| match (audio.performer, audio.title) {
                (Some(performer), Some(title)) => Some(format!("{performer} - {title}")),
                (None, Some(title)) => Some(title),
                _ => None,
            });
            return Some(DiscoveredTrack {
                locator: format!("{LOCATOR_PREFIX}{}", audio.file_id),
                filename_hint,
                duration_hint: audio.duration.filter(|d| *d > 0),
            });
        }

        let document = message.document?;
        if !is_audio_document(&document) {
            return None;
        }
        Some(DiscoveredTrack {
            locator: format!("{LOCATOR_PREFIX}{}", document.file_id),
            filename_hint: document.file_name,
            duration_hint: None,
        })
    }
}

fn is_audio_document(document: &Document) -> bool {
    if document
        .mime_type
        .as_deref()
        .is_some_and(|m| m.starts_with("audio/"))
    {
        return true;
    }
    document
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[async_trait]
impl IngestionSource for TelegramSource {
    async fn poll(&self) -> Result<Vec<DiscoveredTrack>> {
        let offset = self.offset();

        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &[
                    ("offset", offset.to_string()),
                    ("timeout", "0".to_string()),
                    (
                        "allowed_updates",
                        r#"["message","channel_post"]"#.to_string(),
                    ),
                ],
            )
            .await?;

        let mut tracks = Vec::new();
        for update in updates {
            // Un update déjà consommé par un poll concurrent est ignoré
            let seen = self.offset.fetch_max(update.update_id + 1, Ordering::AcqRel);
            if update.update_id < seen {
                continue;
            }

            let Some(message) = update.channel_post.or(update.message) else {
                continue;
            };
            if !self.accepts_chat(&message.chat) {
                debug!(chat_id = message.chat.id, "Ignoring message from another chat");
                continue;
            }
            if let Some(track) = Self::discovered(message) {
                tracks.push(track);
            }
        }

        debug!(count = tracks.len(), offset = self.offset(), "Telegram poll done");
        Ok(tracks)
    }
}

#[async_trait]
impl AudioSourceResolver for TelegramSource {
    fn kind(&self) -> &'static str {
        "telegram"
    }

    fn refreshable(&self) -> bool {
        true
    }

    async fn resolve(&self, locator: &str) -> Result<ResolvedAudio> {
        let file_id = locator
            .trim()
            .strip_prefix(LOCATOR_PREFIX)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResolveError::InvalidLocator(locator.to_string()))?;

        let file: File = self
            .call("getFile", &[("file_id", file_id.to_string())])
            .await?;

        let Some(file_path) = file.file_path else {
            // Fichiers de plus de 20 Mo : l'API ne fournit pas de chemin
            warn!(file_id, "Telegram file has no download path");
            return Err(ResolveError::NoAudioStream(locator.to_string()));
        };

        Ok(ResolvedAudio::url_only(format!(
            "{}/file/bot{}/{}",
            self.api_base, self.token, file_path
        )))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`TelegramSource`]
#[derive(Debug, Clone)]
pub struct TelegramSourceBuilder {
    client: Option<Client>,
    api_base: String,
    token: String,
    channel: Option<String>,
    request_timeout: Duration,
}

impl TelegramSourceBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: None,
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            channel: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Only keep files posted to this channel (`@name` or numeric id)
    ///
    /// An empty value keeps every chat.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        self.channel = (!channel.trim().is_empty()).then(|| channel.trim().to_string());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TelegramSource> {
        if self.token.trim().is_empty() {
            return Err(ResolveError::InvalidLocator(
                "Telegram bot token is empty".to_string(),
            ));
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.request_timeout)
                .build()
                .map_err(|e| ResolveError::Network(e.to_string()))?,
        };

        Ok(TelegramSource {
            client,
            api_base: self.api_base,
            token: self.token,
            channel: self.channel,
            offset: AtomicI64::new(0),
        })
    }
}
