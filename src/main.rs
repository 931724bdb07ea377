//! Fleet Dashboard Backend
//!
//! REST backend for the university transport office: buses, ambulances,
//! routes, passenger assignments and schedules, each persisted as a JSON
//! array file.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{AuthGate, SessionRegistry};
use config::Config;
use models::{Ambulance, Assignment, Bus, Route, Schedule};
use store::{FleetStore, ResourceKind};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FleetStore>,
    pub sessions: Arc<SessionRegistry>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fleet Dashboard Backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.require_auth {
        tracing::warn!("FLEET_REQUIRE_AUTH is off. Resource routes are open to anyone!");
    }
    if config.uses_default_password() {
        tracing::warn!("Administrator password is the built-in default; set FLEET_ADMIN_PASSWORD");
    }
    if config.allow_duplicate_ids {
        tracing::warn!("Duplicate record ids are allowed (FLEET_ALLOW_DUPLICATE_IDS)");
    }

    // Open the collection files
    let store = Arc::new(FleetStore::open(&config.data_dir, config.allow_duplicate_ids).await?);
    for kind in ResourceKind::ALL {
        let path = store.data_dir().join(kind.file_name());
        tracing::debug!("{} collection: {:?}", kind.plural(), path);
    }

    let sessions = Arc::new(SessionRegistry::new(config.session_ttl()?));

    // Create application state
    let state = AppState {
        store,
        sessions,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let gate = AuthGate {
        sessions: state.sessions.clone(),
        api_psk: state.config.api_psk.clone(),
        required: state.config.require_auth,
    };

    // Resource routes
    let resource_routes = Router::new()
        // Buses
        .route(
            "/buses",
            get(api::list_records::<Bus>)
                .post(api::create_record::<Bus>)
                .put(api::update_record::<Bus>)
                .delete(api::delete_record::<Bus>),
        )
        .route("/buses/{id}", get(api::get_record::<Bus>))
        // Ambulances (no create/delete)
        .route(
            "/ambulances",
            get(api::list_records::<Ambulance>).put(api::update_record::<Ambulance>),
        )
        .route("/ambulances/{id}", get(api::get_record::<Ambulance>))
        // Routes
        .route(
            "/routes",
            get(api::list_records::<Route>)
                .post(api::create_record::<Route>)
                .put(api::update_record::<Route>)
                .delete(api::delete_record::<Route>),
        )
        .route("/routes/{id}", get(api::get_record::<Route>))
        // Assignments
        .route(
            "/assignments",
            get(api::list_records::<Assignment>)
                .post(api::create_assignment)
                .put(api::update_record::<Assignment>)
                .delete(api::delete_record::<Assignment>),
        )
        .route("/assignments/{id}", get(api::get_record::<Assignment>))
        // Schedules
        .route(
            "/schedules",
            get(api::list_records::<Schedule>)
                .post(api::create_record::<Schedule>)
                .put(api::update_record::<Schedule>)
                .delete(api::delete_record::<Schedule>),
        )
        .route("/schedules/{id}", get(api::get_record::<Schedule>))
        // Overview
        .route("/dashboard", get(api::get_dashboard))
        .layer(middleware::from_fn(move |req, next| {
            auth::auth_layer(gate.clone(), req, next)
        }));

    // Login/logout are reachable without a session
    let auth_routes = Router::new()
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", resource_routes.merge(auth_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
