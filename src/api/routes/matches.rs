use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::compute_head_to_head;
use crate::models::{HeadToHeadStats, League, LeagueId, Match, MatchId};

#[derive(Debug, Deserialize)]
pub struct LeagueMatchesParams {
    /// `true` for finished fixtures only, `false` for upcoming only
    pub played: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct HeadToHeadResponse {
    #[serde(rename = "match")]
    pub fixture: Match,
    #[serde(flatten)]
    pub stats: HeadToHeadStats,
}

pub async fn list_leagues(State(state): State<AppState>) -> Result<Json<Vec<League>>, ApiError> {
    Ok(Json(state.store.leagues()?))
}

pub async fn league_matches(
    State(state): State<AppState>,
    Path(id): Path<LeagueId>,
    Query(params): Query<LeagueMatchesParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
    if !state.store.leagues()?.iter().any(|l| l.id == id) {
        return Err(ApiError::NotFound(format!("League not found: {}", id)));
    }
    Ok(Json(state.store.matches_for_league(id, params.played)?))
}

pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Match>, ApiError> {
    Ok(Json(state.store.get_match(id)?))
}

/// Form of both sides of a fixture over their finished matches.
pub async fn head_to_head(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<HeadToHeadResponse>, ApiError> {
    let fixture = state.store.get_match(id)?;
    let history = state.store.form_history(&fixture)?;
    let stats = compute_head_to_head(&fixture.home_team(), &fixture.away_team(), &history);

    Ok(Json(HeadToHeadResponse { fixture, stats }))
}
