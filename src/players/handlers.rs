use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    app_state::AppState,
    players::{dtos::PlayerTransfers, transfers::PlayerTransfersParser},
    scrape::{ErrorResponse, ScrapeError},
};

#[utoipa::path(
    get,
    path = "/players/{player_id}/transfers",
    tag = "players",
    params(("player_id" = String, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Transfer history and youth clubs", body = PlayerTransfers),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 502, description = "Upstream site unavailable", body = ErrorResponse)
    )
)]
pub async fn get_player_transfers(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerTransfers>, ScrapeError> {
    let transfers = state
        .scraper
        .retrieve(&PlayerTransfersParser::new(player_id))
        .await?;
    Ok(Json(transfers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fetcher::{MockPageFetcher, PageResponse},
        scrape::{Scraper, SiteUrls},
    };
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    #[tokio::test]
    async fn test_transfers_serialize_nulls_and_camel_case() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch_page().returning(|url| {
            Ok(PageResponse::from_html(
                Url::parse(url).unwrap(),
                r#"<h1 class="data-header__headline-wrapper">Jamal <strong>Musiala</strong></h1>"#,
            ))
        });
        fetcher.expect_fetch_json().returning(|_| {
            Ok(serde_json::json!({"transfers": [{
                "url": "/jamal-musiala/transfers/spieler/580195/transfer_id/3041185",
                "from": {"href": "/fc-chelsea-u18/transfers/verein/9250", "clubName": "Chelsea U18"},
                "to": {"href": "/fc-bayern-munchen-u19/transfers/verein/10398", "clubName": "Bayern U19"},
                "date": "Jul 1, 2019",
                "upcoming": false,
                "season": "19/20",
                "marketValue": "-",
                "fee": "?"
            }]}))
        });
        let state = AppState {
            scraper: Scraper::new(Arc::new(fetcher), SiteUrls::new("https://tm.test")),
        };
        let app = Router::new()
            .route("/players/{player_id}/transfers", get(get_player_transfers))
            .with_state(state);

        let request = Request::builder()
            .uri("/players/580195/transfers")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let transfer = &json["transfers"][0];
        assert_eq!(transfer["id"], "3041185");
        assert_eq!(transfer["clubFrom"]["id"], "9250");
        assert_eq!(transfer["date"], "2019-07-01");
        assert!(transfer["fee"].is_null());
        assert!(transfer["marketValue"].is_null());
        assert_eq!(json["youthClubs"], serde_json::json!([]));
        assert!(json["updatedAt"].is_string());
    }
}
