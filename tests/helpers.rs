use std::{fs, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use tfmkt::{
    app_state::AppState, fetcher::HttpFetcher, routes::create_router, scrape::SiteUrls,
};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Router wired to a real HTTP fetcher that talks to `server`.
pub fn test_app(server: &MockServer) -> Router {
    let client = tfmkt::fetcher::build_client("tfmkt-test/1.0", std::time::Duration::from_secs(5))
        .expect("Failed to build HTTP client");
    let state = AppState::new(
        Arc::new(HttpFetcher::new(client)),
        SiteUrls::new(&server.uri()),
    );
    create_router(state)
}

/// Serves `tests/fixtures/<fixture>` as an HTML page at `page_path`.
pub async fn serve_page(server: &MockServer, page_path: &str, fixture: &str) {
    let html = fs::read_to_string(format!("tests/fixtures/{}", fixture))
        .expect("Failed to read test fixture");
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
