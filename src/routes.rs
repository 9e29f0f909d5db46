use axum::{Json, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    app_state::AppState,
    clubs::{self, dtos as club_dtos},
    competitions::{self, dtos as competition_dtos},
    health, managers,
    managers::dtos as manager_dtos,
    players::{self, dtos as player_dtos},
    scrape::ErrorResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        clubs::handlers::get_club_profile,
        clubs::handlers::get_club_players,
        clubs::handlers::get_club_managers,
        competitions::handlers::get_competition_clubs,
        managers::handlers::get_manager_profile,
        managers::handlers::get_manager_contracts,
        players::handlers::get_player_transfers,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        club_dtos::ClubProfile,
        club_dtos::ClubLeague,
        club_dtos::ClubPlayer,
        club_dtos::ClubPlayers,
        club_dtos::ClubManager,
        club_dtos::ClubManagers,
        competition_dtos::CompetitionClub,
        competition_dtos::CompetitionClubs,
        manager_dtos::ManagerProfile,
        manager_dtos::ManagerPlaceOfBirth,
        manager_dtos::ManagerClub,
        manager_dtos::PlayerProfile,
        manager_dtos::ManagerContract,
        manager_dtos::ManagerContractClub,
        manager_dtos::ManagerContracts,
        player_dtos::PlayerTransfer,
        player_dtos::PlayerTransferClub,
        player_dtos::PlayerTransfers,
    )),
    tags(
        (name = "clubs", description = "Club profiles, rosters and managers"),
        (name = "competitions", description = "Competition participants"),
        (name = "managers", description = "Manager profiles and coaching stations"),
        (name = "players", description = "Player transfer history"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/clubs/{club_id}/profile", get(clubs::handlers::get_club_profile))
        .route("/clubs/{club_id}/players", get(clubs::handlers::get_club_players))
        .route("/clubs/{club_id}/managers", get(clubs::handlers::get_club_managers))
        .route(
            "/competitions/{competition_id}/clubs",
            get(competitions::handlers::get_competition_clubs),
        )
        .route(
            "/managers/profile/{manager_id}",
            get(managers::handlers::get_manager_profile),
        )
        .route(
            "/managers/contracts/{manager_id}",
            get(managers::handlers::get_manager_contracts),
        )
        .route(
            "/players/{player_id}/transfers",
            get(players::handlers::get_player_transfers),
        )
        .with_state(state);

    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/openapi.json", get(openapi))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MockPageFetcher;
    use crate::scrape::SiteUrls;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(
            Arc::new(MockPageFetcher::new()),
            SiteUrls::new("https://tm.test"),
        ))
    }

    #[tokio::test]
    async fn test_health_check_sets_request_id() {
        let response = app()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_openapi_lists_every_endpoint() {
        let response = app()
            .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        for path in [
            "/healthz",
            "/clubs/{club_id}/profile",
            "/clubs/{club_id}/players",
            "/clubs/{club_id}/managers",
            "/competitions/{competition_id}/clubs",
            "/managers/profile/{manager_id}",
            "/managers/contracts/{manager_id}",
            "/players/{player_id}/transfers",
        ] {
            assert!(doc["paths"].get(path).is_some(), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(Request::builder().uri("/teams/27").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
