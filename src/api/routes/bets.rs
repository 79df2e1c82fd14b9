use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{BetLedger, LedgerEntry};
use crate::models::{Bet, BetDraft, BetId, BetOutcome, BettingPerformance, MatchId};

#[derive(Debug, Serialize)]
pub struct MatchBetsResponse {
    pub match_id: MatchId,
    pub bets: Vec<Bet>,
    pub performance: BettingPerformance,
}

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub result: String,
}

/// Bets on one match with their performance.
pub async fn match_bets(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<MatchBetsResponse>, ApiError> {
    state.store.get_match(id)?;
    let ledger = BetLedger::new(state.store.bets_for_match(id)?);

    Ok(Json(MatchBetsResponse {
        match_id: id,
        performance: ledger.performance(),
        bets: ledger.bets().to_vec(),
    }))
}

pub async fn create_bet(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(draft): Json<BetDraft>,
) -> Result<(StatusCode, Json<Bet>), ApiError> {
    let new_bet = draft.validate(id)?;
    let bet = state.store.record_bet(new_bet)?;
    Ok((StatusCode::CREATED, Json(bet)))
}

/// Full bet history joined with match details, newest first.
pub async fn list_bets(
    State(state): State<AppState>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    let ledger = BetLedger::new(state.store.bets()?);
    let matches = state.store.matches()?;
    Ok(Json(ledger.entries(&matches)))
}

pub async fn settle_bet(
    State(state): State<AppState>,
    Path(id): Path<BetId>,
    Json(request): Json<SettleRequest>,
) -> Result<Json<Bet>, ApiError> {
    let outcome: BetOutcome = request.result.parse()?;
    Ok(Json(state.store.settle_bet(id, outcome)?))
}

pub async fn delete_bet(
    State(state): State<AppState>,
    Path(id): Path<BetId>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_bet(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn performance(
    State(state): State<AppState>,
) -> Result<Json<BettingPerformance>, ApiError> {
    Ok(Json(BetLedger::new(state.store.bets()?).performance()))
}
