//! Realtor Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use realtor_engine::infrastructure::{
    clock::SystemClock,
    config::AppConfig,
    logging,
    ports::ClockPort,
    sqlite::{self, SqlitePropertyRepo},
};
use realtor_engine::{api, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root, then whatever the shell provides.
    load_dotenv_from_repo_root();

    let config = AppConfig::from_env()?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init(&config.logging)?;

    tracing::info!("Realtor startup");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    tracing::info!(
        url = %config.database.url,
        pool_size = config.database.pool_size,
        "Connecting to database"
    );
    let pool = sqlite::connect(&config.database).await?;
    sqlite::ensure_schema(&pool).await?;

    let repo = Arc::new(SqlitePropertyRepo::new(pool, clock));
    let app = Arc::new(App::new(repo));

    let router = api::router(app, &config);

    // Start server
    let addr: SocketAddr = config.socket_addr().parse()?;
    tracing::info!(
        rate_limit = config.rate_limit.enabled,
        https_redirect = config.security.redirects_to_https(),
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
