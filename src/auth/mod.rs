//! Registration and login with a mocked OTP flow.
//!
//! Nothing is delivered anywhere: the code is returned in the response and
//! logged, which is exactly what a demo backend wants. Sessions are opaque
//! bearer tokens held in memory for the life of the process.

use crate::error::{Error, Result};
use crate::models::{Role, User};
use crate::store::UserRepository;
use chrono::Utc;
use std::collections::HashMap;

/// In-memory sessions and pending verification codes.
#[derive(Debug, Default)]
pub struct AuthState {
    sessions: HashMap<String, String>, // token -> user id
    pending_otps: HashMap<String, String>, // lowercased email -> code
    token_seq: u64,
    otp_seq: u64,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh six-digit code for the given email, replacing any
    /// earlier one.
    pub fn issue_otp(&mut self, email: &str) -> String {
        self.otp_seq += 1;
        // Deterministic per-process sequence; this is a mock, not security.
        let code = format!("{:06}", (self.otp_seq.wrapping_mul(48_271)) % 1_000_000);
        self.pending_otps
            .insert(email.trim().to_lowercase(), code.clone());
        tracing::info!(%email, %code, "issued verification code");
        code
    }

    /// Consume the pending code for an email. A wrong code leaves the
    /// pending one in place so the user can retry.
    pub fn consume_otp(&mut self, email: &str, code: &str) -> bool {
        let key = email.trim().to_lowercase();
        let matched = self
            .pending_otps
            .get(&key)
            .is_some_and(|expected| expected == code.trim());
        if matched {
            self.pending_otps.remove(&key);
        }
        matched
    }

    pub fn issue_token(&mut self, user_id: &str) -> String {
        self.token_seq += 1;
        let token = format!(
            "bb{}-{:x}-{}",
            self.token_seq,
            Utc::now().timestamp_millis(),
            user_id
        );
        self.sessions.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }
}

/// Create an unverified account and issue its first verification code.
pub fn register<S: UserRepository>(
    store: &mut S,
    auth: &mut AuthState,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<(User, String)> {
    for (field, value) in [("name", name), ("email", email), ("phone", phone)] {
        if value.trim().is_empty() {
            return Err(Error::Validation(format!("{} is required", field)));
        }
    }
    let user = store.create_user(name.trim(), email, phone.trim(), Role::User)?;
    let otp = auth.issue_otp(&user.email);
    Ok((user, otp))
}

/// Issue a login code for an existing account.
pub fn request_otp<S: UserRepository>(
    store: &S,
    auth: &mut AuthState,
    email: &str,
) -> Result<String> {
    let user = store
        .user_by_email(email)
        .ok_or_else(|| Error::NotFound(format!("user {}", email)))?;
    let email = user.email.clone();
    Ok(auth.issue_otp(&email))
}

/// Check a code, mark the account verified and hand back a session token.
pub fn verify_otp<S: UserRepository>(
    store: &mut S,
    auth: &mut AuthState,
    email: &str,
    code: &str,
) -> Result<(User, String)> {
    let user_id = store
        .user_by_email(email)
        .ok_or_else(|| Error::NotFound(format!("user {}", email)))?
        .id
        .clone();
    if !auth.consume_otp(email, code) {
        return Err(Error::Validation("invalid verification code".to_string()));
    }
    let user = {
        let user = store.user_mut(&user_id)?;
        user.verified = true;
        user.clone()
    };
    let token = auth.issue_token(&user.id);
    Ok((user, token))
}
