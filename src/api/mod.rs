pub mod admin;
pub mod auth;
pub mod bets;
pub mod matches;
pub mod wallet;

use crate::auth::AuthState;
use crate::engine::settlement::RedeclarePolicy;
use crate::error::{Error, Result};
use crate::models::{Role, User};
use crate::store::{seed, MemoryStore, UserRepository};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Everything the handlers touch. One coarse lock around the whole thing
/// keeps at most one mutation in flight, matching the single-writer model
/// the store assumes.
pub struct AppState {
    pub store: MemoryStore,
    pub auth: AuthState,
    pub redeclare_policy: RedeclarePolicy,
}

pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    pub fn new(redeclare_policy: RedeclarePolicy) -> Self {
        Self {
            store: MemoryStore::new(),
            auth: AuthState::new(),
            redeclare_policy,
        }
    }

    /// Fresh state with the demo catalog and admin account installed.
    pub fn seeded(redeclare_policy: RedeclarePolicy) -> Result<Self> {
        let mut state = Self::new(redeclare_policy);
        seed::install(&mut state.store)?;
        Ok(state)
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// Build the full API router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/otp", post(auth::request_otp))
        .route("/api/auth/verify", post(auth::verify))
        .route("/api/matches", get(matches::list))
        .route("/api/bets/place", post(bets::place))
        .route("/api/bets", get(bets::list))
        .route("/api/wallet", get(wallet::balance))
        .route("/api/wallet/deposit", post(wallet::deposit))
        .route("/api/wallet/withdraw", post(wallet::withdraw))
        .route("/api/wallet/transactions", get(wallet::transactions))
        .route("/api/admin/matches", post(admin::create_match))
        .route("/api/admin/matches/:id", put(admin::declare_result))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn user_from_bearer(parts: &Parts, state: &SharedState) -> Result<User> {
    let token = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::Unauthorized)?;
    let state = state.read().await;
    let user_id = state
        .auth
        .user_for_token(token)
        .ok_or(Error::Unauthorized)?
        .to_string();
    let user = state.store.user(&user_id).map_err(|_| Error::Unauthorized)?;
    Ok(user.clone())
}

/// Extractor for any authenticated caller.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self> {
        Ok(AuthUser(user_from_bearer(parts, state).await?))
    }
}

/// Extractor that additionally requires the admin role.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<SharedState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self> {
        let user = user_from_bearer(parts, state).await?;
        if user.role != Role::Admin {
            return Err(Error::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
