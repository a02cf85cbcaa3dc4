// src/main.rs — proxydash entry point

use clap::Parser;

use proxydash::api::ApiClient;
use proxydash::cli::{Cli, Commands};
use proxydash::infra::{logger, paths};
use proxydash::session::store::SessionStore;
use proxydash::session::SessionManager;

#[tokio::main]
async fn main() {
    // Respects PROXYDASH_LOG / RUST_LOG
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let storage_dir = cli
        .home
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(paths::storage_dir);

    // Composition root: one façade, one store, one manager, passed everywhere
    let api = ApiClient::new(&storage_dir);
    let store = SessionStore::new(&storage_dir);
    let mut manager = SessionManager::new(api, store);
    manager.bootstrap();

    match cli.command {
        Commands::Login { phone } => proxydash::cli::login::run_login(&mut manager, phone).await,
        Commands::Logout => proxydash::cli::login::run_logout(&mut manager),
        Commands::Status => proxydash::cli::status::show_status(&mut manager).await,
        Commands::Plans => proxydash::cli::plans::show_plans(&manager).await,
        Commands::Usage { period } => proxydash::cli::usage::show_usage(&manager, period).await,
        Commands::Upgrade { plan, method } => {
            proxydash::cli::upgrade::run_upgrade(&manager, plan, method).await
        }
        Commands::Backend { url } => proxydash::cli::backend::run_backend(&manager, url),
    }
}
