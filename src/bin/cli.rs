use anyhow::{Context, Result};
use betbook::engine::settlement::{declare_result, RedeclarePolicy};
use betbook::engine::wallet::{deposit, place_bet, withdraw};
use betbook::export::save_transactions_to_csv;
use betbook::models::Role;
use betbook::store::{
    seed, BetRepository, MatchRepository, MemoryStore, TransactionRepository, UserRepository,
};
use clap::Parser;
use std::path::PathBuf;

/// Replay a scripted day of betting against the in-memory engine and print
/// the resulting wallets and ledgers.
#[derive(Parser)]
#[command(name = "betbook-cli")]
struct Args {
    /// Declare the result a second time to show what the policy does
    #[arg(long)]
    redeclare: bool,
    /// Reject re-declarations instead of re-applying settlement
    #[arg(long)]
    first_wins: bool,
    /// Write the full transaction ledger to this CSV file
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let policy = if args.first_wins {
        RedeclarePolicy::FirstWins
    } else {
        RedeclarePolicy::Editable
    };

    let mut store = MemoryStore::new();
    seed::install(&mut store)?;

    println!("Betbook settlement simulation\n");

    // Two punters on opposite sides of the first seeded match.
    let asha = store.create_user("Asha", "asha@example.com", "+111", Role::User)?;
    let ben = store.create_user("Ben", "ben@example.com", "+222", Role::User)?;
    deposit(&mut store, &asha.id, 1000.0)?;
    deposit(&mut store, &ben.id, 500.0)?;

    let catalog = store.catalog();
    let m = catalog
        .first()
        .and_then(|category| category.matches.first())
        .cloned()
        .context("seed catalog is empty")?;
    let side_a = m.teams[0].clone();
    let side_b = m.teams[1].clone();
    println!("Match {}: {} vs {}", m.id, side_a, side_b);

    place_bet(&mut store, &asha.id, &m.id, &side_a, 100.0)?;
    place_bet(&mut store, &ben.id, &m.id, &side_b, 200.0)?;
    println!("Asha stakes 100.00 on {}", side_a);
    println!("Ben stakes 200.00 on {}", side_b);

    let updated = declare_result(&mut store, policy, &m.id, &side_a)?;
    println!(
        "\nResult declared: {}",
        updated.result.unwrap_or_default()
    );

    if args.redeclare {
        match declare_result(&mut store, policy, &m.id, &side_a) {
            Ok(_) => println!("Re-declared {} (settlement re-applied)", side_a),
            Err(e) => println!("Re-declaration rejected: {}", e),
        }
    }

    // Ben cashes out what is left.
    match withdraw(&mut store, &ben.id, 100.0) {
        Ok(tx) => println!("Ben withdraws 100.00, balance {:.2}", tx.balance_after),
        Err(e) => println!("Ben's withdrawal rejected: {}", e),
    }

    for user_id in [&asha.id, &ben.id] {
        let user = store.user(user_id)?;
        println!("\n{} ({}) balance {:.2}", user.name, user.id, user.balance);
        for bet in store.bets_for_user(user_id) {
            println!(
                "  bet {} on {} stake {:.2} -> {}",
                bet.id,
                bet.team,
                bet.amount,
                bet.status.as_str()
            );
        }
        for tx in store.transactions_for_user(user_id) {
            println!(
                "  tx {} {} {:.2} (balance {:.2})",
                tx.id,
                tx.kind.as_str(),
                tx.amount,
                tx.balance_after
            );
        }
    }

    if let Some(path) = args.export_csv {
        save_transactions_to_csv(store.ledger(), &path)?;
        println!("\nSaved transaction ledger to {}", path.display());
    }

    Ok(())
}
