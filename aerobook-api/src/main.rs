use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aerobook_api::{app, AppState};
use aerobook_booking::{EngineSettings, ReservationEngine};
use aerobook_store::{
    DbClient, MemoryStore, PgBookingRepo, PgCatalogRepo, PgPassengerRepo, PgQueryRepo,
    PgRatingRepo,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "aerobook_api=debug,aerobook_booking=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = aerobook_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Aerobook API on port {}", config.server.port);

    let settings = EngineSettings {
        reference_attempts: config.booking.reference_attempts,
        admission_retries: config.booking.admission_retries,
    };

    let engine = match &config.database {
        Some(database) => {
            let client = DbClient::new(&database.url)
                .await
                .expect("Failed to connect to database");
            client.migrate().await.expect("Failed to run migrations");
            let pool = client.pool.clone();
            ReservationEngine::new(
                Arc::new(PgCatalogRepo::new(pool.clone())),
                Arc::new(PgPassengerRepo::new(pool.clone())),
                Arc::new(PgBookingRepo::new(
                    pool.clone(),
                    config.booking.lock_timeout_ms,
                )),
                Arc::new(PgRatingRepo::new(pool.clone())),
                Arc::new(PgQueryRepo::new(pool)),
                settings,
            )
        }
        None => {
            tracing::info!("No database configured, using the in-process store");
            let store = Arc::new(MemoryStore::with_lock_timeout(Duration::from_millis(
                config.booking.lock_timeout_ms,
            )));
            ReservationEngine::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                settings,
            )
        }
    };

    let app = app(AppState {
        engine: Arc::new(engine),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
