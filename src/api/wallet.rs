use super::{AuthUser, SharedState};
use crate::engine::wallet as ops;
use crate::error::Result;
use crate::models::Transaction;
use crate::store::{TransactionRepository, UserRepository};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub balance: f64,
}

pub async fn balance(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Result<Json<WalletResponse>> {
    let state = state.read().await;
    let user = state.store.user(&user.id)?;
    Ok(Json(WalletResponse {
        balance: user.balance,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    pub transaction: Transaction,
    pub balance: f64,
}

pub async fn deposit(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AmountRequest>,
) -> Result<Json<MutationResponse>> {
    let mut state = state.write().await;
    let tx = ops::deposit(&mut state.store, &user.id, req.amount)?;
    let balance = tx.balance_after;
    Ok(Json(MutationResponse {
        transaction: tx,
        balance,
    }))
}

pub async fn withdraw(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AmountRequest>,
) -> Result<Json<MutationResponse>> {
    let mut state = state.write().await;
    let tx = ops::withdraw(&mut state.store, &user.id, req.amount)?;
    let balance = tx.balance_after;
    Ok(Json(MutationResponse {
        transaction: tx,
        balance,
    }))
}

/// The caller's audit trail, oldest first.
pub async fn transactions(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<Transaction>> {
    let state = state.read().await;
    Json(state.store.transactions_for_user(&user.id))
}
