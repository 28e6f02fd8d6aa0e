//! webproj API Service Library
//!
//! HTTP front end for CRS transformations between Danish, Greenlandic and
//! global coordinate reference systems.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// API versions served side by side with identical semantics.
pub const API_VERSIONS: [&str; 2] = ["v1.0", "v1.1"];

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new().route("/", get(handlers::landing::landing_handler));

    for version in API_VERSIONS {
        app = app
            .route(
                &format!("/{version}/"),
                get(handlers::landing::landing_handler),
            )
            .route(
                &format!("/{version}/crs/"),
                get(handlers::crs::list_crs_handler),
            )
            .route(
                &format!("/{version}/crs/:id"),
                get(handlers::crs::get_crs_handler),
            )
            .route(
                &format!("/{version}/trans/:src/:dst/:coords"),
                get(handlers::trans::transform_handler),
            );
    }

    app
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
