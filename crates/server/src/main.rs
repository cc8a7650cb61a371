//! Lectro server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use lectro_api::{AppState, auth_middleware, health, router as api_router};
use lectro_common::Config;
use lectro_core::{AuthService, NotificationService, SwapService, TimetableService};
use lectro_db::repositories::{
    EnrollmentRepository, LectureHallRepository, NotificationRepository, SwapRequestRepository,
    TimetableRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories into services.
fn build_state(db: &Arc<DatabaseConnection>, config: &Config) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(db));
    let timetable_repo = TimetableRepository::new(Arc::clone(db));
    let enrollment_repo = EnrollmentRepository::new(Arc::clone(db));

    let notification_service =
        NotificationService::new(NotificationRepository::new(Arc::clone(db)));

    let swap_service = SwapService::new(
        Arc::clone(db),
        SwapRequestRepository::new(Arc::clone(db)),
        timetable_repo.clone(),
        user_repo.clone(),
        LectureHallRepository::new(Arc::clone(db)),
        enrollment_repo.clone(),
        notification_service.clone(),
    );

    AppState {
        auth_service: AuthService::new(user_repo, &config.auth),
        swap_service,
        notification_service,
        timetable_service: TimetableService::new(timetable_repo, enrollment_repo),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectro=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting Lectro server...");

    let config = Config::load()?;

    let db = lectro_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    lectro_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let state = build_state(&db, &config);

    let app = Router::new()
        .route("/", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
