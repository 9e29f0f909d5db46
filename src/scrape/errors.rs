use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::extractor::Entity;
use crate::fetcher::FetchError;

/// Failures that escape an entity parser. Row and subsection problems are
/// recovered inside the parser and never surface here.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    #[error("upstream unavailable: {0}")]
    Upstream(#[from] FetchError),
}

impl ScrapeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ScrapeError::NotFound { .. } => StatusCode::NOT_FOUND,
            ScrapeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// An optional part of a record that could not be produced.
#[derive(Error, Debug)]
pub enum SubsectionError {
    #[error("secondary source unavailable: {0}")]
    Unavailable(FetchError),

    #[error("unexpected shape: {0}")]
    Shape(String),
}

/// Falls back to an empty value when an optional subsection fails.
pub fn recover<T: Default>(section: &str, id: &str, result: Result<T, SubsectionError>) -> T {
    result.unwrap_or_else(|e| {
        error!(section, id, error = %e, "failed to parse subsection");
        T::default()
    })
}
