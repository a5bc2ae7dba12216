//! BiteSwipe API server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::{routing::get, Json, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use biteswipe::adapters::http::{session_routes, user_routes, SessionHandlers, UserHandlers};
use biteswipe::adapters::notifications::{
    FcmConfig, FcmNotificationSender, LogOnlyNotificationSender,
};
use biteswipe::adapters::places::{GooglePlacesConfig, GooglePlacesLookup, MockRestaurantLookup};
use biteswipe::adapters::postgres::{PostgresSessionStore, PostgresUserDirectory};
use biteswipe::application::handlers::session::{
    CreateSessionHandler, FinalizeSessionHandler, GetSessionHandler, InviteParticipantHandler,
    JoinSessionHandler, ListUserSessionsHandler, MarkDoneSwipingHandler, RecordSwipeHandler,
};
use biteswipe::application::handlers::user::{
    CreateUserHandler, GetUserHandler, UpdateFcmTokenHandler,
};
use biteswipe::config::AppConfig;
use biteswipe::ports::{NotificationSender, RestaurantLookup, SessionStore, UserDirectory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    // Database pool and schema.
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Stores.
    let sessions: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(PostgresUserDirectory::new(pool));

    // Outbound collaborators: real adapters when keys are configured,
    // otherwise the local stand-ins.
    let restaurants: Arc<dyn RestaurantLookup> = match config.places.api_key() {
        Some(key) => {
            let places_config = GooglePlacesConfig::new(key)
                .with_base_url(config.places.base_url.clone())
                .with_timeout(config.places.timeout());
            Arc::new(GooglePlacesLookup::new(places_config)?)
        }
        None => {
            tracing::warn!("no Places API key configured, using mock restaurant lookup");
            Arc::new(MockRestaurantLookup::new(config.places.mock_candidates))
        }
    };

    let notifier: Arc<dyn NotificationSender> = match config.notifications.fcm_server_key() {
        Some(key) => {
            let fcm_config = FcmConfig::new(key)
                .with_base_url(config.notifications.base_url.clone())
                .with_timeout(config.notifications.timeout());
            Arc::new(FcmNotificationSender::new(fcm_config, users.clone())?)
        }
        None => {
            tracing::warn!("no FCM server key configured, invites are logged only");
            Arc::new(LogOnlyNotificationSender::new())
        }
    };

    // Application handlers.
    let session_handlers = SessionHandlers::new(
        Arc::new(CreateSessionHandler::new(
            sessions.clone(),
            users.clone(),
            restaurants,
        )),
        Arc::new(GetSessionHandler::new(sessions.clone())),
        Arc::new(InviteParticipantHandler::new(
            sessions.clone(),
            users.clone(),
            notifier,
        )),
        Arc::new(JoinSessionHandler::new(sessions.clone(), users.clone())),
        Arc::new(RecordSwipeHandler::new(sessions.clone())),
        Arc::new(MarkDoneSwipingHandler::new(sessions.clone())),
        Arc::new(FinalizeSessionHandler::new(sessions.clone())),
    );

    let user_handlers = UserHandlers::new(
        Arc::new(CreateUserHandler::new(users.clone())),
        Arc::new(GetUserHandler::new(users.clone())),
        Arc::new(UpdateFcmTokenHandler::new(users)),
        Arc::new(ListUserSessionsHandler::new(sessions)),
    );

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/sessions", session_routes(session_handlers))
        .nest("/users", user_routes(user_handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server started");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to BiteSwipe API",
        "status": "online",
        "serverTime": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
