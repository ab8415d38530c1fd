use super::{AuthUser, SharedState};
use crate::engine::wallet as ops;
use crate::error::Result;
use crate::models::Bet;
use crate::store::BetRepository;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetResponse {
    pub bet: Bet,
    pub balance: f64,
}

pub async fn place(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Json(req): Json<PlaceBetRequest>,
) -> Result<Json<PlaceBetResponse>> {
    let mut state = state.write().await;
    let (bet, balance) = ops::place_bet(
        &mut state.store,
        &user.id,
        &req.match_id,
        &req.team,
        req.amount,
    )?;
    Ok(Json(PlaceBetResponse { bet, balance }))
}

/// The caller's bets, oldest first.
pub async fn list(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<Bet>> {
    let state = state.read().await;
    Json(state.store.bets_for_user(&user.id))
}
