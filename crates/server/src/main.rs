//! Beanbook server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use beanbook_api::{AppState, router as api_router};
use beanbook_common::{Authenticator, Config, LocalStorage};
use beanbook_core::{
    CafeService, FriendService, MessagingService, NotificationService, ReviewService, UserService,
    start_notification_worker,
};
use beanbook_db::repositories::{
    CafeRepository, FriendshipRepository, MessageRepository, NotificationRepository,
    ReviewLikeRepository, ReviewRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beanbook=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting beanbook server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = beanbook_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    beanbook_db::migrate(&db).await?;
    info!("Migrations completed");

    // The token secret is read once here and handed to the authenticator;
    // it never lives in global state.
    let authenticator = Authenticator::new(
        &config.auth.token_secret,
        chrono::Duration::days(config.auth.token_ttl_days),
    );

    // Blob store for uploaded images
    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let cafe_repo = CafeRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let review_like_repo = ReviewLikeRepository::new(Arc::clone(&db));
    let friendship_repo = FriendshipRepository::new(Arc::clone(&db));
    let message_repo = MessageRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Start the notification fan-out worker
    let notifier = start_notification_worker(notification_repo.clone());
    info!("Notification worker started");

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let cafe_service = CafeService::new(cafe_repo.clone());

    let mut friend_service = FriendService::new(friendship_repo.clone(), user_repo.clone());
    friend_service.set_notifier(notifier.clone());

    let messaging_service =
        MessagingService::new(message_repo, friendship_repo, user_repo.clone());

    let notification_service = NotificationService::new(notification_repo);

    let mut review_service =
        ReviewService::new(review_repo, review_like_repo, cafe_repo, user_repo);
    review_service.set_notifier(notifier);

    // Create app state
    let state = AppState {
        user_service,
        friend_service,
        messaging_service,
        notification_service,
        review_service,
        cafe_service,
        authenticator,
        storage,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            "/uploads",
            ServeDir::new(PathBuf::from(&config.storage.base_path)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            beanbook_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
