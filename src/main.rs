use dotenvy::dotenv;
use pet_shop::{
    api::{self, AppState},
    config::{self, database},
    core::category,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let db = database::create_connection(&app_config.database.url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the configured categories
    category::seed_categories(&db, &app_config.categories)
        .await
        .inspect_err(|e| error!("Failed to seed categories: {}", e))?;

    // 6. Serve the API until Ctrl+C
    let listener = tokio::net::TcpListener::bind(&app_config.server.listen)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.server.listen, e))?;
    info!("Listening on {}", app_config.server.listen);

    let app = api::router(AppState::new(db, app_config.pagination));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received.");
}
