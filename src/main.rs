use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

use hackerflow::database::MIGRATOR;
use hackerflow::web::middleware::auth as auth_middleware;
use hackerflow::web::routes::{friends, hackathons, health, users};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    info!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to database");

    MIGRATOR.run(&pool).await.expect("Migrations failed");

    // 3. Protected routes under one middleware layer
    let protected_routes = Router::new()
        .route("/api/users/:user_id", get(users::user_profile_handler))
        .route(
            "/api/users/:user_id/relationship",
            get(users::relationship_handler),
        )
        .route("/api/friends", get(friends::list_friends_handler))
        .route(
            "/api/friends/:friendship_id",
            delete(friends::remove_friend_handler),
        )
        .route(
            "/api/friends/requests",
            get(friends::list_requests_handler).post(friends::send_request_handler),
        )
        .route(
            "/api/friends/requests/:request_id/accept",
            post(friends::accept_request_handler),
        )
        .route(
            "/api/friends/requests/:request_id/reject",
            post(friends::reject_request_handler),
        )
        .route(
            "/api/friends/requests/:request_id/cancel",
            post(friends::cancel_request_handler),
        )
        .route(
            "/api/hackathons/drafts",
            post(hackathons::create_draft_handler),
        )
        .route(
            "/api/hackathons/drafts/:hackathon_id",
            get(hackathons::draft_detail_handler),
        )
        .route(
            "/api/hackathons/drafts/:hackathon_id/basics",
            put(hackathons::save_basics_handler),
        )
        .route(
            "/api/hackathons/drafts/:hackathon_id/details",
            put(hackathons::save_details_handler),
        )
        .route(
            "/api/hackathons/drafts/:hackathon_id/venue",
            put(hackathons::save_venue_handler),
        )
        .route(
            "/api/hackathons/drafts/:hackathon_id/publish",
            post(hackathons::publish_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_auth));

    // 4. Build the whole application
    let app = Router::new()
        // Public routes
        .route("/api/health", get(health::health_handler))
        .route("/api/hackathons", get(hackathons::browse_handler))
        .route(
            "/api/hackathons/:hackathon_id",
            get(hackathons::detail_handler),
        )
        // Protected routes
        .merge(protected_routes)
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    // 5. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Could not bind on {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind on fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    info!("Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
