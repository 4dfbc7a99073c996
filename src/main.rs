use std::net::SocketAddr;

use axum_server::tls_rustls::RustlsConfig;
use counselor_admin::config::AppConfig;
use counselor_admin::{db, routes, AppState};
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counselor_admin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::migrate(&pool).await?;
    tracing::info!("Database migrations applied");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let tls = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let app = routes::router(AppState { db: pool, config });

    match tls {
        Some((cert, key)) => {
            // Ignored if a provider is already installed for the process.
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
            let tls_config = RustlsConfig::from_pem_file(&cert, &key).await?;

            tracing::info!(host = %addr, "Starting counselor admin API (HTTPS)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::info!(host = %addr, "Starting counselor admin API");
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
