use super::SharedState;
use crate::auth as flow;
use crate::error::Result;
use crate::models::User;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// The code is returned in the body: mocked delivery, demo backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: User,
    pub otp: String,
}

pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let mut state = state.write().await;
    let state = &mut *state;
    let (user, otp) = flow::register(
        &mut state.store,
        &mut state.auth,
        &req.name,
        &req.email,
        &req.phone,
    )?;
    Ok(Json(RegisterResponse { user, otp }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    pub otp: String,
}

pub async fn request_otp(
    State(state): State<SharedState>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<OtpResponse>> {
    let mut state = state.write().await;
    let state = &mut *state;
    let otp = flow::request_otp(&state.store, &mut state.auth, &req.email)?;
    Ok(Json(OtpResponse { otp }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user: User,
    pub token: String,
}

pub async fn verify(
    State(state): State<SharedState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let mut state = state.write().await;
    let state = &mut *state;
    let (user, token) = flow::verify_otp(&mut state.store, &mut state.auth, &req.email, &req.otp)?;
    Ok(Json(VerifyResponse { user, token }))
}
