//! API REST de la radio (`/api/radio`).

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use pmoplaylist::Track;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, RadioError};
use crate::favorites::{Favorite, FavoriteStream};
use crate::service::{RadioService, StationInfo};
use crate::share::ShareInfo;
use crate::state::{PlaylistSnapshot, RadioSnapshot, StreamInfo};

/// Router `/api/radio` avec tous les endpoints REST.
pub fn create_api_router(service: Arc<RadioService>) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/stream", get(get_stream))
        .route("/playlist", get(get_playlist).post(submit_track))
        .route("/next", post(next_track))
        .route("/favorites/save", post(save_favorite))
        .route("/favorites/get", get(get_favorite))
        .route("/favorites/stream", get(stream_favorite))
        .route("/share/current", get(share_current))
        .route("/info", get(get_info))
        .with_state(service)
}

/// Morceau tel que vu par les clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    pub id: String,
    pub locator: String,
    #[schema(example = "Bohemian Rhapsody")]
    pub title: String,
    #[schema(example = "Queen")]
    pub artist: String,
    /// Durée en secondes
    #[schema(example = 354)]
    pub duration: u64,
    pub audio_url: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<&Track> for TrackResponse {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            locator: track.locator.clone(),
            title: track.display_title().to_string(),
            artist: track.display_artist().to_string(),
            duration: track.duration,
            audio_url: track.audio_url.clone(),
            thumbnail: track.thumbnail.clone(),
        }
    }
}

fn track_list(tracks: &[Track]) -> Vec<TrackResponse> {
    tracks.iter().map(TrackResponse::from).collect()
}

/// État de la radio.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateResponse {
    pub current_track: Option<TrackResponse>,
    /// Secondes écoulées dans le morceau courant
    #[schema(example = 42.5)]
    pub position: f64,
    pub is_playing: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub playlist_count: usize,
    pub just_played: Option<TrackResponse>,
    pub up_next: Vec<TrackResponse>,
    pub history: Vec<TrackResponse>,
}

impl From<RadioSnapshot> for StateResponse {
    fn from(snapshot: RadioSnapshot) -> Self {
        Self {
            current_track: snapshot.current_track.as_ref().map(TrackResponse::from),
            position: snapshot.position,
            is_playing: snapshot.is_playing,
            started_at: snapshot.started_at,
            playlist_count: snapshot.playlist_count,
            just_played: snapshot.just_played.as_ref().map(TrackResponse::from),
            up_next: track_list(&snapshot.up_next),
            history: track_list(&snapshot.history),
        }
    }
}

/// URL audio et position pour rejoindre la diffusion.
#[derive(Debug, Serialize, ToSchema)]
pub struct StreamResponse {
    pub audio_url: String,
    pub position: f64,
    pub track: TrackResponse,
}

impl From<StreamInfo> for StreamResponse {
    fn from(info: StreamInfo) -> Self {
        Self {
            audio_url: info.audio_url,
            position: info.position,
            track: TrackResponse::from(&info.track),
        }
    }
}

/// Contenu de la file de lecture.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaylistResponse {
    pub count: usize,
    pub current_id: Option<String>,
    pub tracks: Vec<TrackResponse>,
}

impl From<PlaylistSnapshot> for PlaylistResponse {
    fn from(snapshot: PlaylistSnapshot) -> Self {
        Self {
            count: snapshot.tracks.len(),
            current_id: snapshot.current_id,
            tracks: track_list(&snapshot.tracks),
        }
    }
}

/// Requête d'ajout d'un morceau.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// URL ou référence comprise par la source audio
    #[serde(alias = "url")]
    #[schema(example = "https://www.youtube.com/watch?v=fJ9rUzIMcZQ")]
    pub locator: String,
    pub title: Option<String>,
    pub artist: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub track: TrackResponse,
    pub saved_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            track: TrackResponse::from(&favorite.track),
            saved_at: favorite.saved_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteStreamResponse {
    pub audio_url: String,
    pub track: TrackResponse,
}

impl From<FavoriteStream> for FavoriteStreamResponse {
    fn from(stream: FavoriteStream) -> Self {
        Self {
            audio_url: stream.audio_url,
            track: TrackResponse::from(&stream.track),
        }
    }
}

/// Métadonnées de partage du morceau en cours.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub track: TrackResponse,
}

impl From<ShareInfo> for ShareResponse {
    fn from(share: ShareInfo) -> Self {
        Self {
            url: share.url,
            title: share.title,
            description: share.description,
            image: share.image,
            track: TrackResponse::from(&share.track),
        }
    }
}

/// Identité de la station.
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    #[schema(example = "Madrid Rock Radio")]
    pub name: String,
    #[schema(example = "youtube")]
    pub source_kind: String,
    #[schema(example = "rotate_to_tail")]
    pub rotation: String,
    pub playlist_count: usize,
}

impl From<StationInfo> for InfoResponse {
    fn from(info: StationInfo) -> Self {
        Self {
            name: info.name,
            source_kind: info.source_kind,
            rotation: info.rotation.to_string(),
            playlist_count: info.playlist_count,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/radio/state",
    tag = "radio",
    responses(
        (status = 200, description = "État courant (peut faire avancer la rotation)", body = StateResponse)
    )
)]
pub async fn get_state(State(service): State<Arc<RadioService>>) -> Json<StateResponse> {
    Json(service.store().state().await.into())
}

#[utoipa::path(
    get,
    path = "/api/radio/stream",
    tag = "radio",
    responses(
        (status = 200, description = "URL audio et position du morceau en cours", body = StreamResponse),
        (status = 404, description = "Aucun morceau en cours", body = ErrorResponse),
        (status = 503, description = "Audio indisponible", body = ErrorResponse)
    )
)]
pub async fn get_stream(
    State(service): State<Arc<RadioService>>,
) -> Result<Json<StreamResponse>, RadioError> {
    let info = service.store().stream().await?;
    Ok(Json(info.into()))
}

#[utoipa::path(
    get,
    path = "/api/radio/playlist",
    tag = "radio",
    responses(
        (status = 200, description = "Contenu de la file", body = PlaylistResponse)
    )
)]
pub async fn get_playlist(State(service): State<Arc<RadioService>>) -> Json<PlaylistResponse> {
    Json(service.store().playlist().await.into())
}

#[utoipa::path(
    post,
    path = "/api/radio/playlist",
    tag = "radio",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Morceau ajouté", body = TrackResponse),
        (status = 400, description = "Locator vide ou impossible à résoudre", body = ErrorResponse)
    )
)]
pub async fn submit_track(
    State(service): State<Arc<RadioService>>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<TrackResponse>), RadioError> {
    let track = service
        .store()
        .submit(&req.locator, req.title, req.artist)
        .await?;
    Ok((StatusCode::CREATED, Json(TrackResponse::from(&track))))
}

#[utoipa::path(
    post,
    path = "/api/radio/next",
    tag = "radio",
    responses(
        (status = 200, description = "Passage forcé au morceau suivant", body = StateResponse)
    )
)]
pub async fn next_track(State(service): State<Arc<RadioService>>) -> Json<StateResponse> {
    Json(service.store().force_next().await.into())
}

#[utoipa::path(
    post,
    path = "/api/radio/favorites/save",
    tag = "favorites",
    responses(
        (status = 200, description = "Morceau en cours enregistré comme favori", body = FavoriteResponse),
        (status = 404, description = "Aucun morceau en cours", body = ErrorResponse)
    )
)]
pub async fn save_favorite(
    State(service): State<Arc<RadioService>>,
) -> Result<Json<FavoriteResponse>, RadioError> {
    let favorite = service.save_current_favorite().await?;
    Ok(Json(favorite.into()))
}

#[utoipa::path(
    get,
    path = "/api/radio/favorites/get",
    tag = "favorites",
    responses(
        (status = 200, description = "Favori enregistré", body = FavoriteResponse),
        (status = 404, description = "Aucun favori", body = ErrorResponse)
    )
)]
pub async fn get_favorite(
    State(service): State<Arc<RadioService>>,
) -> Result<Json<FavoriteResponse>, RadioError> {
    let favorite = service.favorites().get().await?;
    Ok(Json(favorite.into()))
}

#[utoipa::path(
    get,
    path = "/api/radio/favorites/stream",
    tag = "favorites",
    responses(
        (status = 200, description = "URL audio du favori", body = FavoriteStreamResponse),
        (status = 404, description = "Aucun favori", body = ErrorResponse),
        (status = 503, description = "Audio indisponible", body = ErrorResponse)
    )
)]
pub async fn stream_favorite(
    State(service): State<Arc<RadioService>>,
) -> Result<Json<FavoriteStreamResponse>, RadioError> {
    let stream = service.favorites().stream_url().await?;
    Ok(Json(stream.into()))
}

#[utoipa::path(
    get,
    path = "/api/radio/share/current",
    tag = "radio",
    responses(
        (status = 200, description = "Lien et texte de partage", body = ShareResponse),
        (status = 404, description = "Aucun morceau en cours", body = ErrorResponse)
    )
)]
pub async fn share_current(
    State(service): State<Arc<RadioService>>,
) -> Result<Json<ShareResponse>, RadioError> {
    let share = service.share_current().await?;
    Ok(Json(share.into()))
}

#[utoipa::path(
    get,
    path = "/api/radio/info",
    tag = "radio",
    responses(
        (status = 200, description = "Identité de la station", body = InfoResponse)
    )
)]
pub async fn get_info(State(service): State<Arc<RadioService>>) -> Json<InfoResponse> {
    Json(service.info().await.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadioConfig;
    use crate::testing::StubResolver;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn service() -> Arc<RadioService> {
        let config = RadioConfig {
            shuffle_on_start: false,
            ..Default::default()
        };
        Arc::new(RadioService::new(&config, Arc::new(StubResolver::refreshable())))
    }

    #[tokio::test]
    async fn test_idle_radio() {
        let router = create_api_router(service());

        let (status, json) = call(router.clone(), "GET", "/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["current_track"].is_null());
        assert_eq!(json["is_playing"], false);

        let (status, json) = call(router.clone(), "GET", "/stream", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "NOT_PLAYING");

        let (status, _) = call(router.clone(), "GET", "/favorites/get", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(router, "GET", "/share/current", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_then_stream() {
        let router = create_api_router(service());

        let (status, json) = call(
            router.clone(),
            "POST",
            "/playlist",
            Some(serde_json::json!({"url": "https://youtu.be/abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Title of https://youtu.be/abc");

        let (status, json) = call(router.clone(), "GET", "/stream", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["audio_url"].as_str().unwrap().starts_with("https://cdn.test/"));

        let (status, json) = call(router, "GET", "/playlist", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
    }

    #[tokio::test]
    async fn test_empty_locator_is_a_bad_request() {
        let router = create_api_router(service());
        let (status, json) = call(
            router,
            "POST",
            "/playlist",
            Some(serde_json::json!({"locator": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "INVALID_REQUEST");
    }
}
