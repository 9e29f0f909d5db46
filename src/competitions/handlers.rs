use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    app_state::AppState,
    competitions::{
        clubs::CompetitionClubsParser,
        dtos::{ClubsQuery, CompetitionClubs},
    },
    scrape::{ErrorResponse, ScrapeError},
};

#[utoipa::path(
    get,
    path = "/competitions/{competition_id}/clubs",
    tag = "competitions",
    params(("competition_id" = String, Path, description = "Competition code, e.g. GB1"), ClubsQuery),
    responses(
        (status = 200, description = "Participating clubs", body = CompetitionClubs),
        (status = 404, description = "Competition not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_competition_clubs(
    State(state): State<AppState>,
    Path(competition_id): Path<String>,
    Query(query): Query<ClubsQuery>,
) -> Result<Json<CompetitionClubs>, ScrapeError> {
    let parser = CompetitionClubsParser::new(
        competition_id,
        query.season_id,
        query.is_knockout.unwrap_or(false),
    );
    Ok(Json(state.scraper.retrieve(&parser).await?))
}
