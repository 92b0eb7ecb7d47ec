use axum::{extract::Path, Extension, Json};
use deploytrack_core::{EnvironmentOverview, ResolvedState};

use super::error::ApiError;
use crate::services::Services;

#[tracing::instrument(name = "http::environment::overview", skip(services))]
pub async fn overview(
    Path(environment): Path<String>,
    Extension(services): Extension<Services>,
) -> Result<Json<EnvironmentOverview>, ApiError> {
    let overview = services
        .health
        .resolve_environment_overview(&environment)
        .await?;

    Ok(Json(overview))
}

#[tracing::instrument(name = "http::environment::current", skip(services))]
pub async fn current(
    Path((component_id, environment)): Path<(String, String)>,
    Extension(services): Extension<Services>,
) -> Result<Json<ResolvedState>, ApiError> {
    let state = services
        .resolver
        .resolve_current(&component_id, &environment)
        .await?;

    Ok(Json(state))
}
