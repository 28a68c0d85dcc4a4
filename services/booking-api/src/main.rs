//! Kaiwa Booking API
//!
//! Lesson booking microservice providing the booking REST endpoint.
//!
//! ## REST Endpoints
//!
//! - `POST /api/v1/lessons` - Dispatch a booking action
//!   (`create` | `cancel` | `getAvailableSlots`)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use kaiwa_booking_core::{
    BookingService, GoogleCalendarGateway, HttpIdentityProvider, LineNotifier,
};
use kaiwa_db::pg::Repositories;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("booking_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Kaiwa Booking API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool
    let pool = kaiwa_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Create repositories
    let repos = Repositories::new(pool.clone());

    // Create booking service with its production collaborators
    let booking = BookingService::new(
        config.booking.clone(),
        Arc::new(repos.bookings.clone()),
        Arc::new(repos.students.clone()),
        Arc::new(repos.availability.clone()),
        Arc::new(repos.credits.clone()),
        GoogleCalendarGateway::new(config.calendar.clone()),
        HttpIdentityProvider::new(config.identity_base_url.clone()),
        LineNotifier::new(config.line_channel_token.clone()),
    );

    // Create application state
    let state = AppState::new(booking, pool, config.clone());

    // Build HTTP router
    let app = build_router(state, metrics_handle);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // API v1 routes
    let api_v1 = Router::new().route("/lessons", post(handlers::dispatch_lesson_action));

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    // Combine all routes
    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .merge(metrics_route) // Metrics route without timeout
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Latency buckets sized for workflows dominated by external calls
    let booking_latency_buckets = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            booking_latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("booking_operation_duration_seconds".to_string()),
            booking_latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    // Register metrics with descriptions
    metrics::describe_counter!("bookings_created_total", "Total lessons booked");
    metrics::describe_counter!("bookings_cancelled_total", "Total bookings cancelled");
    metrics::describe_counter!("slot_queries_total", "Total slot availability queries");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "booking_operation_duration_seconds",
        "Booking operation latency in seconds by operation type"
    );

    Ok(handle)
}

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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
