use anyhow::Result;
use betbook::api::{self, AppState};
use betbook::config::Config;
use betbook::store::{seed, MatchRepository};
use clap::Parser;

/// Demo sports-betting backend. All state lives in process memory and is
/// lost on restart.
#[derive(Parser)]
#[command(name = "betbook-server")]
struct Args {
    /// Address to bind, overrides BIND_ADDR
    #[arg(long)]
    bind: Option<String>,
    /// What happens when a result is re-declared: editable | first_wins
    #[arg(long)]
    redeclare_policy: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(policy) = args.redeclare_policy {
        config.redeclare_policy = policy.parse()?;
    }

    let state = AppState::seeded(config.redeclare_policy)?.into_shared();
    {
        let state = state.read().await;
        let catalog = state.store.catalog();
        let matches: usize = catalog.iter().map(|c| c.matches.len()).sum();
        println!(
            "Seeded catalog: {} categories, {} matches",
            catalog.len(),
            matches
        );
        println!("Admin account: {}", seed::ADMIN_EMAIL);
        println!("Re-declare policy: {:?}", config.redeclare_policy);
    }

    let app = api::router(state);

    println!("\nStarting betbook server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
