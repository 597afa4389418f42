//! offerclaim service entry point
//!
//! Bootstrap order: args → config → logging → store client (once per
//! process, then injected everywhere) → gateway.

use std::sync::Arc;

use offerclaim::auth::AuthVerifier;
use offerclaim::config::AppConfig;
use offerclaim::gateway::{self, state::AppState};
use offerclaim::store::{ClaimStore, MemoryStore, PgStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = offerclaim::logging::init_logging(&config.logging);

    tracing::info!("Starting offerclaim service in {} env", env);

    let store: Arc<dyn ClaimStore> = match &config.postgres_url {
        Some(url) => match PgStore::connect(url).await {
            Ok(store) => {
                println!("🗄️  Store backend: PostgreSQL");
                Arc::new(store)
            }
            Err(e) => {
                eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("⚠️  No postgres_url configured - using in-memory store (dev only)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(
        store,
        AuthVerifier::new(config.auth.jwt_secret.clone()),
        config.claim.max_commit_attempts,
    ));

    let port = get_port_override().unwrap_or(config.gateway.port);
    gateway::run_server(&config.gateway.host, port, state).await;
}
