pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod normalize;
pub mod seed;
pub mod services;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use config::Config;
use db::Store;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve") => run_server(config).await,
        Some("bootstrap") => run_bootstrap(config).await,
        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            println!("Unknown command: {other}");
            print_help();
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("clubhub v{} starting...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state(&config).await?;

    seed::run_if_empty(&state.store, &config.general.seed_path).await?;

    let app = api::router(state, &config.server.cors_allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let server_handle = tokio::spawn(async move {
        info!("Web server running at http://{}", addr);
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }

    server_handle.abort();
    info!("Server stopped");

    Ok(())
}

/// Recreates the database file from scratch and loads the seed data,
/// mirroring a first-run setup.
async fn run_bootstrap(config: Config) -> anyhow::Result<()> {
    let db_url = &config.general.database_path;

    if !db_url.contains(":memory:") {
        let path = db_url.trim_start_matches("sqlite:");
        if std::path::Path::new(path).exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove old database: {path}"))?;
            info!("Removed existing database at {}", path);
        }
    }

    let store = Store::new(db_url).await?;
    seed::run(&store, &config.general.seed_path).await?;

    info!("Bootstrap complete");
    Ok(())
}

fn print_help() {
    println!("clubhub v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: clubhub [command]");
    println!();
    println!("Commands:");
    println!("  serve       Run the HTTP server (default)");
    println!("  bootstrap   Recreate the database and load seed data");
    println!("  help        Show this message");
}
