use axum::http::Request;
use hyper::Body;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploytrack::config::ServiceConfig;
use deploytrack::http::http_router;
use deploytrack::services::Services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env()?;

    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(&config.service_name)
        .install_simple()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    let db = Arc::new(
        PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?,
    );

    sqlx::migrate!().run(&*db).await?;

    let services = Services::relational(&db);

    let router = http_router(services).layer(TraceLayer::new_for_http().make_span_with(
        |request: &Request<Body>| {
            tracing::info_span!(
                "http",
                http.method = %request.method(),
                http.url = %request.uri(),
                http.status_code = tracing::field::Empty,
                otel.name = %format!("HTTP {} {}", request.method(), request.uri().path()),
                otel.kind = "server",
                otel.status_code = tracing::field::Empty,
            )
        },
    ));

    tracing::info!("http service listening on {}", config.endpoint);

    axum::Server::bind(&config.endpoint)
        .serve(router.into_make_service())
        .await?;

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}
