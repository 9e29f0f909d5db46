use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    app_state::AppState,
    managers::{
        contracts::ManagerContractsParser,
        dtos::{ManagerContracts, ManagerProfile},
        profile::ManagerProfileParser,
    },
    scrape::{ErrorResponse, ScrapeError},
};

#[utoipa::path(
    get,
    path = "/managers/profile/{manager_id}",
    tag = "managers",
    params(("manager_id" = String, Path, description = "Manager identifier")),
    responses(
        (status = 200, description = "Manager profile", body = ManagerProfile),
        (status = 404, description = "Manager not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_manager_profile(
    State(state): State<AppState>,
    Path(manager_id): Path<String>,
) -> Result<Json<ManagerProfile>, ScrapeError> {
    let profile = state
        .scraper
        .retrieve(&ManagerProfileParser::new(manager_id))
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/managers/contracts/{manager_id}",
    tag = "managers",
    params(("manager_id" = String, Path, description = "Manager identifier")),
    responses(
        (status = 200, description = "Coaching stations", body = ManagerContracts),
        (status = 404, description = "Manager not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_manager_contracts(
    State(state): State<AppState>,
    Path(manager_id): Path<String>,
) -> Result<Json<ManagerContracts>, ScrapeError> {
    let contracts = state
        .scraper
        .retrieve(&ManagerContractsParser::new(manager_id))
        .await?;
    Ok(Json(contracts))
}
