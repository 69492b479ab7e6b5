use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_raffle::{
    cache,
    config::Config,
    controllers,
    database::Database,
    raffle::{AudioCues, DrawAnimator},
    redis_client::RedisClient,
    services::notify::WinnerNotifier,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Seat Raffle API");

    // Connect to the database
    let db = Database::new(&config.database.url, config.database.pool_size).await?;
    info!("Database connected");

    // Run migrations
    db.run_migrations().await?;

    // Connect to Redis
    let redis = RedisClient::new(&config.redis.url).await?;
    info!("Redis connected");

    // Initialize the cache
    let cache = cache::CacheService::new(redis.clone(), db.clone());
    cache.warmup_cache().await;
    info!("Cache warmed up");

    let animator = Arc::new(DrawAnimator::new());
    let notifier = WinnerNotifier::from_config(&config.notify);

    // Create the shared application state
    let app_state = Arc::new(AppState {
        db: db.clone(),
        redis: redis.clone(),
        cache,
        config: config.clone(),
        animator: animator.clone(),
        audio: AudioCues::new(),
        notifier,
    });

    // --- Start background tasks ---

    // Task to reap finished reveal snapshots every minute
    task::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let reaped = animator.reap_finished(Duration::from_secs(600));
            if reaped > 0 {
                info!("Reaped {} finished draw snapshots", reaped);
            }
        }
    });

    // --- Start the web server ---

    // Create the main router
    let app = Router::new()
        .route("/", get(|| async { "Seat Raffle API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        // Mount the routes from the controllers module
        .nest("/api", controllers::routes())
        // Pass the application state to the router
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http())
        // The member/admin UI lives on another origin
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
