use super::{MatchRepository, MemoryStore, UserRepository};
use crate::error::Result;
use crate::models::Role;
use chrono::{Duration, Utc};
use std::collections::HashMap;

/// Email of the seeded admin account. Log in through the normal OTP flow.
pub const ADMIN_EMAIL: &str = "admin@betbook.dev";

/// Install the demo catalog and the default admin account into a fresh store.
pub fn install(store: &mut MemoryStore) -> Result<()> {
    let admin = store.create_user("Admin", ADMIN_EMAIL, "+10000000000", Role::Admin)?;
    store.user_mut(&admin.id)?.verified = true;

    let football = store.add_category("Football");
    let cricket = store.add_category("Cricket");

    let kickoff = Utc::now() + Duration::hours(6);

    store.create_match(
        &football.id,
        vec!["Arsenal".into(), "Chelsea".into()],
        kickoff,
        odds(&[("Arsenal", 1.8), ("Chelsea", 2.4)]),
    )?;
    store.create_match(
        &football.id,
        vec!["Barcelona".into(), "Real Madrid".into()],
        kickoff + Duration::hours(3),
        odds(&[("Barcelona", 2.1), ("Real Madrid", 2.0)]),
    )?;
    store.create_match(
        &cricket.id,
        vec!["India".into(), "Australia".into()],
        kickoff + Duration::days(1),
        odds(&[("India", 1.6), ("Australia", 2.7)]),
    )?;
    store.create_match(
        &cricket.id,
        vec!["England".into(), "Pakistan".into()],
        kickoff + Duration::days(2),
        odds(&[("England", 1.9), ("Pakistan", 2.2)]),
    )?;

    Ok(())
}

fn odds(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(team, price)| (team.to_string(), *price))
        .collect()
}
