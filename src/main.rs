use anyhow::Context;
use library_lending::{
    adapters::{
        memory::LibraryStore,
        postgres::{PostgresBookRepository, PostgresBorrowingRepository, PostgresPaymentRepository},
    },
    api::{handlers::AppState, router::create_router},
    application::ServiceDependencies,
    config::{AppConfig, StorageKind},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("library_lending={},tower_http=debug", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting library-lending v{}", env!("CARGO_PKG_VERSION"));

    let service_deps = match config.storage {
        StorageKind::Postgres => build_postgres_dependencies(&config).await?,
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(LibraryStore::new());
            ServiceDependencies {
                book_repository: store.clone(),
                borrowing_repository: store.clone(),
                payment_repository: store,
            }
        }
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

async fn build_postgres_dependencies(config: &AppConfig) -> anyhow::Result<ServiceDependencies> {
    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(ServiceDependencies {
        book_repository: Arc::new(PostgresBookRepository::new(pool.clone())),
        borrowing_repository: Arc::new(PostgresBorrowingRepository::new(pool.clone())),
        payment_repository: Arc::new(PostgresPaymentRepository::new(pool)),
    })
}
