use axum::{routing::get, Extension, Router};

use crate::services::Services;

pub mod environment;
pub mod error;
pub mod health;

pub fn http_router(services: Services) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/environments/:environment/overview",
            get(environment::overview),
        )
        .route(
            "/components/:component_id/environments/:environment",
            get(environment::current),
        )
        .layer(Extension(services))
}
