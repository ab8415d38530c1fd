use super::{AdminUser, SharedState};
use crate::engine::settlement;
use crate::error::Result;
use crate::models::Match;
use crate::store::MatchRepository;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub teams: Vec<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub odds: HashMap<String, f64>,
}

pub async fn create_match(
    State(state): State<SharedState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateMatchRequest>,
) -> Result<Json<Match>> {
    let mut state = state.write().await;
    let created =
        state
            .store
            .create_match(&req.category_id, req.teams, req.start_time, req.odds)?;
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareResultRequest {
    #[serde(default)]
    pub winner: String,
}

/// Declare the winner and settle every bet on the match.
pub async fn declare_result(
    State(state): State<SharedState>,
    AdminUser(_admin): AdminUser,
    Path(match_id): Path<String>,
    Json(req): Json<DeclareResultRequest>,
) -> Result<Json<Match>> {
    let mut state = state.write().await;
    let policy = state.redeclare_policy;
    let updated = settlement::declare_result(&mut state.store, policy, &match_id, &req.winner)?;
    Ok(Json(updated))
}
