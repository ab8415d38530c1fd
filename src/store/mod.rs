pub mod seed;

use crate::error::{Error, Result};
use crate::models::{
    Bet, BetStatus, CatalogCategory, Category, Match, Role, Transaction, TransactionKind, User,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Account lookup and creation. Users are never deleted.
pub trait UserRepository {
    fn create_user(&mut self, name: &str, email: &str, phone: &str, role: Role) -> Result<User>;
    fn user(&self, id: &str) -> Result<&User>;
    fn user_mut(&mut self, id: &str) -> Result<&mut User>;
    fn user_by_email(&self, email: &str) -> Option<&User>;
}

/// The match catalog, grouped by category for listing.
pub trait MatchRepository {
    fn add_category(&mut self, name: &str) -> Category;
    fn create_match(
        &mut self,
        category_id: &str,
        teams: Vec<String>,
        start_time: DateTime<Utc>,
        odds: HashMap<String, f64>,
    ) -> Result<Match>;
    fn get_match(&self, id: &str) -> Result<&Match>;
    fn get_match_mut(&mut self, id: &str) -> Result<&mut Match>;
    fn catalog(&self) -> Vec<CatalogCategory>;
}

/// Append-only bet ledger. Placement is the only way in; settlement flips
/// the status in place.
pub trait BetRepository {
    fn create_bet(&mut self, user_id: &str, match_id: &str, team: &str, amount: f64) -> Bet;
    fn bet_mut(&mut self, id: &str) -> Result<&mut Bet>;
    fn bet_ids_for_match(&self, match_id: &str) -> Vec<String>;
    fn bets_for_user(&self, user_id: &str) -> Vec<Bet>;
}

/// Append-only audit trail of wallet mutations.
pub trait TransactionRepository {
    fn record_transaction(
        &mut self,
        user_id: &str,
        kind: TransactionKind,
        amount: f64,
        balance_after: f64,
    ) -> Transaction;
    fn transactions_for_user(&self, user_id: &str) -> Vec<Transaction>;
}

/// In-memory datastore backing all repositories. Everything is keyed by id
/// for O(1) lookup; nothing survives a process restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, User>,
    emails: HashMap<String, String>, // lowercased email -> user id
    categories: Vec<Category>,
    matches: HashMap<String, Match>,
    bets: HashMap<String, Bet>,
    transactions: Vec<Transaction>,
    user_seq: u64,
    category_seq: u64,
    match_seq: u64,
    bet_seq: u64,
    tx_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full audit trail, oldest first.
    pub fn ledger(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// Ids are "<prefix><seq>". Tie-breaking on the numeric part keeps listings
/// in creation order once a sequence passes nine ("m10" after "m2").
fn id_ordinal(id: &str) -> u64 {
    id.trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0)
}

impl UserRepository for MemoryStore {
    fn create_user(&mut self, name: &str, email: &str, phone: &str, role: Role) -> Result<User> {
        let key = email.trim().to_lowercase();
        if self.emails.contains_key(&key) {
            return Err(Error::Validation(format!("email {} already registered", email)));
        }
        self.user_seq += 1;
        let user = User {
            id: format!("u{}", self.user_seq),
            name: name.to_string(),
            email: key.clone(),
            phone: phone.to_string(),
            balance: 0.0,
            role,
            verified: false,
        };
        self.emails.insert(key, user.id.clone());
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn user(&self, id: &str) -> Result<&User> {
        self.users
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    fn user_mut(&mut self, id: &str) -> Result<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        let id = self.emails.get(&email.trim().to_lowercase())?;
        self.users.get(id)
    }
}

impl MatchRepository for MemoryStore {
    fn add_category(&mut self, name: &str) -> Category {
        self.category_seq += 1;
        let category = Category {
            id: format!("c{}", self.category_seq),
            name: name.to_string(),
        };
        self.categories.push(category.clone());
        category
    }

    fn create_match(
        &mut self,
        category_id: &str,
        teams: Vec<String>,
        start_time: DateTime<Utc>,
        odds: HashMap<String, f64>,
    ) -> Result<Match> {
        if !self.categories.iter().any(|c| c.id == category_id) {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }
        if teams.len() < 2 {
            return Err(Error::Validation(
                "a match needs at least two outcome labels".to_string(),
            ));
        }
        if teams.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::Validation(
                "outcome labels must not be blank".to_string(),
            ));
        }
        self.match_seq += 1;
        let m = Match {
            id: format!("m{}", self.match_seq),
            category_id: category_id.to_string(),
            teams,
            start_time,
            odds,
            result: None,
        };
        self.matches.insert(m.id.clone(), m.clone());
        Ok(m)
    }

    fn get_match(&self, id: &str) -> Result<&Match> {
        self.matches
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("match {}", id)))
    }

    fn get_match_mut(&mut self, id: &str) -> Result<&mut Match> {
        self.matches
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("match {}", id)))
    }

    fn catalog(&self) -> Vec<CatalogCategory> {
        self.categories
            .iter()
            .map(|category| {
                let mut matches: Vec<Match> = self
                    .matches
                    .values()
                    .filter(|m| m.category_id == category.id)
                    .cloned()
                    .collect();
                matches.sort_by(|a, b| {
                    a.start_time
                        .cmp(&b.start_time)
                        .then_with(|| id_ordinal(&a.id).cmp(&id_ordinal(&b.id)))
                });
                CatalogCategory {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    matches,
                }
            })
            .collect()
    }
}

impl BetRepository for MemoryStore {
    fn create_bet(&mut self, user_id: &str, match_id: &str, team: &str, amount: f64) -> Bet {
        self.bet_seq += 1;
        let bet = Bet {
            id: format!("b{}", self.bet_seq),
            user_id: user_id.to_string(),
            match_id: match_id.to_string(),
            team: team.to_string(),
            amount,
            status: BetStatus::Pending,
            placed_at: Utc::now(),
        };
        self.bets.insert(bet.id.clone(), bet.clone());
        bet
    }

    fn bet_mut(&mut self, id: &str) -> Result<&mut Bet> {
        self.bets
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("bet {}", id)))
    }

    fn bet_ids_for_match(&self, match_id: &str) -> Vec<String> {
        let mut bets: Vec<&Bet> = self
            .bets
            .values()
            .filter(|b| b.match_id == match_id)
            .collect();
        bets.sort_by(|a, b| {
            a.placed_at
                .cmp(&b.placed_at)
                .then_with(|| id_ordinal(&a.id).cmp(&id_ordinal(&b.id)))
        });
        bets.into_iter().map(|b| b.id.clone()).collect()
    }

    fn bets_for_user(&self, user_id: &str) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self
            .bets
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bets.sort_by(|a, b| {
            a.placed_at
                .cmp(&b.placed_at)
                .then_with(|| id_ordinal(&a.id).cmp(&id_ordinal(&b.id)))
        });
        bets
    }
}

impl TransactionRepository for MemoryStore {
    fn record_transaction(
        &mut self,
        user_id: &str,
        kind: TransactionKind,
        amount: f64,
        balance_after: f64,
    ) -> Transaction {
        self.tx_seq += 1;
        let tx = Transaction {
            id: format!("t{}", self.tx_seq),
            user_id: user_id.to_string(),
            kind,
            amount,
            timestamp: Utc::now(),
            balance_after,
        };
        self.transactions.push(tx.clone());
        tx
    }

    fn transactions_for_user(&self, user_id: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}
