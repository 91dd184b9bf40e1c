//! Documentation OpenAPI de l'API radio.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::get_state,
        crate::api::get_stream,
        crate::api::get_playlist,
        crate::api::submit_track,
        crate::api::next_track,
        crate::api::save_favorite,
        crate::api::get_favorite,
        crate::api::stream_favorite,
        crate::api::share_current,
        crate::api::get_info,
    ),
    components(
        schemas(
            crate::api::TrackResponse,
            crate::api::StateResponse,
            crate::api::StreamResponse,
            crate::api::PlaylistResponse,
            crate::api::SubmitRequest,
            crate::api::FavoriteResponse,
            crate::api::FavoriteStreamResponse,
            crate::api::ShareResponse,
            crate::api::InfoResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "radio", description = "Lecture partagée, playlist et partage"),
        (name = "favorites", description = "Favori unique de la station")
    ),
    info(
        title = "PMORadio API",
        version = "0.1.0",
        description = r#"
# Radio partagée

Tous les clients entendent le même morceau à la même position. La position
est recalculée à chaque requête ; la rotation avance quand un client lit
l'état après la fin du morceau.

- `GET /state` : morceau en cours, position, historique et prochains morceaux
- `GET /stream` : URL audio et position pour rejoindre la diffusion
- `POST /playlist` : ajoute un morceau (`locator`, ou `url`)
- `POST /next` : passe au morceau suivant
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct RadioApiDoc;
