use crate::error::{Error, Result};
use crate::models::{BetStatus, Match, TransactionKind};
use crate::store::{BetRepository, MatchRepository, TransactionRepository, UserRepository};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Multiplier used when the declared winner is missing from the odds map.
pub const DEFAULT_WIN_ODDS: f64 = 2.0;

/// What happens when a result is declared for a match that already has one.
///
/// `Editable` re-applies settlement unconditionally, which double-credits
/// winners; `FirstWins` rejects the second call. Both are live behaviors,
/// selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeclarePolicy {
    #[default]
    Editable,
    FirstWins,
}

impl FromStr for RedeclarePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "editable" => Ok(RedeclarePolicy::Editable),
            "first_wins" => Ok(RedeclarePolicy::FirstWins),
            other => Err(Error::Validation(format!(
                "unknown redeclare policy '{}', expected 'editable' or 'first_wins'",
                other
            ))),
        }
    }
}

/// Apply a declared outcome to a match and resolve every bet placed on it.
///
/// Winning bets are credited stake x odds (falling back to
/// [`DEFAULT_WIN_ODDS`] when the winner has no odds entry) and a win lands
/// in the audit ledger; losing bets are marked lost with no wallet change.
/// There is no transactionality across bets: a credit that cannot be applied
/// because the owning user is missing is logged and skipped, and everything
/// applied before it stands.
pub fn declare_result<S>(
    store: &mut S,
    policy: RedeclarePolicy,
    match_id: &str,
    winning_outcome: &str,
) -> Result<Match>
where
    S: UserRepository + MatchRepository + BetRepository + TransactionRepository,
{
    let odds = {
        let m = store.get_match_mut(match_id)?;
        if m.result.is_some() && policy == RedeclarePolicy::FirstWins {
            return Err(Error::AlreadyDeclared(match_id.to_string()));
        }
        m.result = Some(winning_outcome.to_string());
        m.odds.get(winning_outcome).copied().unwrap_or(DEFAULT_WIN_ODDS)
    };

    for bet_id in store.bet_ids_for_match(match_id) {
        let (user_id, team, stake) = {
            let bet = store.bet_mut(&bet_id)?;
            (bet.user_id.clone(), bet.team.clone(), bet.amount)
        };

        if team == winning_outcome {
            store.bet_mut(&bet_id)?.status = BetStatus::Won;
            let winnings = stake * odds;
            match store.user_mut(&user_id) {
                Ok(user) => {
                    user.balance += winnings;
                    let balance = user.balance;
                    store.record_transaction(&user_id, TransactionKind::Win, winnings, balance);
                }
                Err(_) => {
                    // No rollback: the bet stays marked won, earlier credits stand.
                    tracing::warn!(bet = %bet_id, user = %user_id, "skipping credit, user missing");
                }
            }
        } else {
            store.bet_mut(&bet_id)?.status = BetStatus::Lost;
        }
    }

    tracing::info!(%match_id, winner = %winning_outcome, "result declared");
    Ok(store.get_match(match_id)?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::wallet::{deposit, place_bet};
    use crate::models::Role;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use std::collections::HashMap;

    // Spec fixture: punter funded with 1000, one match with TeamA at 2.5.
    fn setup() -> (MemoryStore, String, String) {
        let mut store = MemoryStore::new();
        let user = store
            .create_user("Asha", "asha@example.com", "+111", Role::User)
            .unwrap();
        deposit(&mut store, &user.id, 1000.0).unwrap();

        let cat = store.add_category("Football");
        let m = store
            .create_match(
                &cat.id,
                vec!["TeamA".into(), "TeamB".into()],
                Utc::now(),
                HashMap::from([("TeamA".to_string(), 2.5)]),
            )
            .unwrap();
        (store, user.id, m.id)
    }

    #[test]
    fn test_winning_bet_credits_stake_times_odds() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();
        assert_eq!(store.user(&user_id).unwrap().balance, 900.0);

        let updated = declare_result(
            &mut store,
            RedeclarePolicy::Editable,
            &match_id,
            "TeamA",
        )
        .unwrap();

        assert_eq!(updated.result.as_deref(), Some("TeamA"));
        assert_eq!(store.user(&user_id).unwrap().balance, 1150.0); // 900 + 100 x 2.5
        let bets = store.bets_for_user(&user_id);
        assert_eq!(bets[0].status, BetStatus::Won);
    }

    #[test]
    fn test_losing_bet_leaves_balance_untouched() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();

        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamB").unwrap();

        assert_eq!(store.user(&user_id).unwrap().balance, 900.0);
        assert_eq!(store.bets_for_user(&user_id)[0].status, BetStatus::Lost);
    }

    #[test]
    fn test_missing_odds_key_defaults_to_two() {
        let (mut store, user_id, match_id) = setup();
        // TeamB has no odds entry.
        place_bet(&mut store, &user_id, &match_id, "TeamB", 100.0).unwrap();

        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamB").unwrap();

        assert_eq!(store.user(&user_id).unwrap().balance, 1100.0); // 900 + 100 x 2.0
    }

    #[test]
    fn test_win_lands_in_the_ledger() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();
        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamA").unwrap();

        let txs = store.transactions_for_user(&user_id);
        let win = txs.last().unwrap();
        assert_eq!(win.kind, TransactionKind::Win);
        assert_eq!(win.amount, 250.0);
        assert_eq!(win.balance_after, 1150.0);
    }

    #[test]
    fn test_unknown_match_rejected() {
        let (mut store, _, _) = setup();
        let err =
            declare_result(&mut store, RedeclarePolicy::Editable, "m99", "TeamA").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    // Documents the current editable behavior: re-declaring re-applies
    // settlement and double-credits winners.
    #[test]
    fn test_editable_redeclare_double_credits() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();

        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamA").unwrap();
        assert_eq!(store.user(&user_id).unwrap().balance, 1150.0);

        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamA").unwrap();
        assert_eq!(store.user(&user_id).unwrap().balance, 1400.0);
    }

    #[test]
    fn test_first_wins_rejects_second_declaration() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();

        declare_result(&mut store, RedeclarePolicy::FirstWins, &match_id, "TeamA").unwrap();
        let err = declare_result(&mut store, RedeclarePolicy::FirstWins, &match_id, "TeamB")
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyDeclared(_)));
        assert_eq!(store.user(&user_id).unwrap().balance, 1150.0);
        assert_eq!(
            store.get_match(&match_id).unwrap().result.as_deref(),
            Some("TeamA")
        );
    }

    #[test]
    fn test_missing_user_is_skipped_without_rollback() {
        let (mut store, user_id, match_id) = setup();
        place_bet(&mut store, &user_id, &match_id, "TeamA", 100.0).unwrap();
        // A bet whose owner never existed; the ledger allows it, settlement
        // must not blow up on it.
        store.create_bet("ghost", &match_id, "TeamA", 100.0);

        declare_result(&mut store, RedeclarePolicy::Editable, &match_id, "TeamA").unwrap();

        assert_eq!(store.user(&user_id).unwrap().balance, 1150.0);
        let ghost_bets = store.bets_for_user("ghost");
        assert_eq!(ghost_bets[0].status, BetStatus::Won);
        assert!(store.transactions_for_user("ghost").is_empty());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "editable".parse::<RedeclarePolicy>().unwrap(),
            RedeclarePolicy::Editable
        );
        assert_eq!(
            "FIRST_WINS".parse::<RedeclarePolicy>().unwrap(),
            RedeclarePolicy::FirstWins
        );
        assert!("latest".parse::<RedeclarePolicy>().is_err());
    }
}
