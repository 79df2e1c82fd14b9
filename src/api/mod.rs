//! REST API endpoints.
//!
//! Axum-based HTTP API over the local store: fixtures, head-to-head form,
//! bet recording and settlement, and betting performance.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::models::BetError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<BetError> for ApiError {
    fn from(err: BetError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BetNotFound(_) | StorageError::MatchNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            StorageError::InvalidBet(e) => e.into(),
            other => {
                // Never hand partial data to the calculators
                error!("Store read failed: {}", other);
                ApiError::Internal("data unavailable".to_string())
            }
        }
    }
}

/// Build the API router with request tracing.
pub fn build_router(state: AppState) -> Router {
    use routes::{bets, matches};

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/leagues", get(matches::list_leagues))
        .route("/api/leagues/:id/matches", get(matches::league_matches))
        .route("/api/matches/:id", get(matches::get_match))
        .route("/api/matches/:id/head-to-head", get(matches::head_to_head))
        .route(
            "/api/matches/:id/bets",
            get(bets::match_bets).post(bets::create_bet),
        )
        .route("/api/bets", get(bets::list_bets))
        .route("/api/bets/:id", axum::routing::delete(bets::delete_bet))
        .route("/api/bets/:id/result", put(bets::settle_bet))
        .route("/api/performance", get(bets::performance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origin; `*` allows any.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            layer
        }
    }
}
