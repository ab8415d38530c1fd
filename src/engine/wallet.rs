use crate::error::{Error, Result};
use crate::models::{Bet, Transaction, TransactionKind};
use crate::store::{BetRepository, MatchRepository, TransactionRepository, UserRepository};

/// Credit a wallet. No upper bound; every deposit lands in the ledger.
pub fn deposit<S>(store: &mut S, user_id: &str, amount: f64) -> Result<Transaction>
where
    S: UserRepository + TransactionRepository,
{
    check_amount(amount)?;
    let balance = {
        let user = store.user_mut(user_id)?;
        user.balance += amount;
        user.balance
    };
    Ok(store.record_transaction(user_id, TransactionKind::Deposit, amount, balance))
}

/// Debit a wallet. Rejected outright if it would drive the balance negative.
pub fn withdraw<S>(store: &mut S, user_id: &str, amount: f64) -> Result<Transaction>
where
    S: UserRepository + TransactionRepository,
{
    check_amount(amount)?;
    let balance = {
        let user = store.user_mut(user_id)?;
        if amount > user.balance {
            return Err(Error::InsufficientFunds {
                balance: user.balance,
                requested: amount,
            });
        }
        user.balance -= amount;
        user.balance
    };
    Ok(store.record_transaction(user_id, TransactionKind::Withdrawal, amount, balance))
}

/// Place a stake on one outcome of a match. The wallet is debited at
/// placement time, before any result is known; a rejected placement leaves
/// no bet and no transaction behind.
pub fn place_bet<S>(
    store: &mut S,
    user_id: &str,
    match_id: &str,
    team: &str,
    amount: f64,
) -> Result<(Bet, f64)>
where
    S: UserRepository + MatchRepository + BetRepository + TransactionRepository,
{
    check_amount(amount)?;
    if team.trim().is_empty() {
        return Err(Error::Validation("team is required".to_string()));
    }
    store.get_match(match_id)?;

    let balance = {
        let user = store.user_mut(user_id)?;
        if amount > user.balance {
            return Err(Error::InsufficientFunds {
                balance: user.balance,
                requested: amount,
            });
        }
        user.balance -= amount;
        user.balance
    };

    let bet = store.create_bet(user_id, match_id, team, amount);
    store.record_transaction(user_id, TransactionKind::Bet, amount, balance);
    Ok((bet, balance))
}

fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation("amount must be positive".to_string()));
    }
    Ok(())
}
