use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use common::{Eula, PlatformRecord, PlatformTable};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/version",
    tag = "Releases",
    operation_id = "listVersions",
    summary = "List published platform releases",
    description = "Returns every supported platform in publication order, keyed by platform id. Values are returned exactly as stored.",
    responses(
        (status = 200, description = "Published releases", body = HashMap<String, PlatformRecord>),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_versions(State(state): State<AppState>) -> Result<Json<PlatformTable>, AppError> {
    let table = state.records.platform_table().await?;
    Ok(Json(table))
}

#[utoipa::path(
    post,
    path = "/eula",
    tag = "Releases",
    operation_id = "getEula",
    summary = "Get the current EULA",
    description = "Returns the EULA version and text. Both are empty strings until a EULA is published.",
    responses(
        (status = 200, description = "Current EULA", body = Eula),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_eula(State(state): State<AppState>) -> Result<Json<Eula>, AppError> {
    Ok(Json(state.records.eula().await?))
}
