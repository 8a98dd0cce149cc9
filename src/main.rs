use anyhow::{Context, Result};
use realty_portal::{
    build_app,
    features::{admin::repository::AdminRepository, chat::hub::ChatHub},
    services::{database::Database, keepalive::KeepAlive, storage::Storage},
    utilities::{app_state::AppState, config::Config},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::init().await.context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "{},realty_portal={},sqlx=warn,tower_http=info",
                config.tracing_level, config.tracing_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting realty portal API");

    let database = Database::new(&config)
        .await
        .context("Failed to connect to database")?;
    database.migrate().await.context("Failed to run migrations")?;

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        AdminRepository::ensure(&database.pool, email, password)
            .await
            .context("Failed to create bootstrap admin")?;
    }

    let storage = Storage::new(&config).context("Failed to configure object storage")?;
    if !storage.image_urls.is_configured() {
        tracing::warn!(
            "STORAGE_URL/STORAGE_KEY not set, images resolve against {}",
            config.storage_public_base
        );
    }

    let keepalive = KeepAlive::new(&config);
    let keepalive_task = keepalive.spawn(database.pool.clone());

    let state = AppState {
        database,
        storage,
        config: config.clone(),
        chat: ChatHub::new(),
        keepalive,
    };
    let app = build_app(state).context("Failed to build router")?;

    tracing::info!("Listening on {}", config.server_address);
    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    keepalive_task.abort();
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
