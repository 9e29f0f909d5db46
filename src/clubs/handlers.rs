use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    app_state::AppState,
    clubs::{
        dtos::{ClubManagers, ClubPlayers, ClubProfile, PlayersQuery},
        managers::ClubManagersParser,
        players::ClubPlayersParser,
        profile::ClubProfileParser,
    },
    scrape::{ErrorResponse, ScrapeError},
};

#[utoipa::path(
    get,
    path = "/clubs/{club_id}/profile",
    tag = "clubs",
    params(("club_id" = String, Path, description = "Club identifier")),
    responses(
        (status = 200, description = "Club profile", body = ClubProfile),
        (status = 404, description = "Club not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_club_profile(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<ClubProfile>, ScrapeError> {
    let profile = state.scraper.retrieve(&ClubProfileParser::new(club_id)).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/clubs/{club_id}/players",
    tag = "clubs",
    params(("club_id" = String, Path, description = "Club identifier"), PlayersQuery),
    responses(
        (status = 200, description = "Club or national team roster", body = ClubPlayers),
        (status = 404, description = "Club not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_club_players(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
    Query(query): Query<PlayersQuery>,
) -> Result<Json<ClubPlayers>, ScrapeError> {
    let parser = ClubPlayersParser::new(
        club_id,
        query.season_id,
        query.is_national.unwrap_or(false),
    );
    Ok(Json(state.scraper.retrieve(&parser).await?))
}

#[utoipa::path(
    get,
    path = "/clubs/{club_id}/managers",
    tag = "clubs",
    params(("club_id" = String, Path, description = "Club identifier")),
    responses(
        (status = 200, description = "Managers in the order listed by the site", body = ClubManagers),
        (status = 404, description = "Club not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_club_managers(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<ClubManagers>, ScrapeError> {
    let managers = state.scraper.retrieve(&ClubManagersParser::new(club_id)).await?;
    Ok(Json(managers))
}
