use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::error::{ActionError, STATUS_OK, StatusResponse};
use crate::extractors::auth::ReleaseManager;
use crate::extractors::json::ActionJson;
use crate::models::admin::{PurgeResponse, UpdateEulaRequest, UpdateVersionDataRequest};
use crate::state::AppState;
use crate::utils::releases;

#[utoipa::path(
    post,
    path = "/update_version_data",
    tag = "Admin",
    operation_id = "updateVersionData",
    summary = "Replace the platform release table",
    description = "Publishes the submitted platforms in submission order and clears the release fields of previously supported platforms that are absent. Requires `release:manage`. Not atomic: a storage failure can leave some fields written.",
    request_body = UpdateVersionDataRequest,
    responses(
        (status = 200, description = "Table replaced (`OK`)", body = StatusResponse),
        (status = 400, description = "Body missing or malformed (`invalid message`)", body = StatusResponse),
        (status = 403, description = "Missing token or permission (`insufficient permissions`)", body = StatusResponse),
        (status = 500, description = "Storage failure (`storage error`)", body = StatusResponse),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, manager, payload), fields(subject = %manager.0.subject, platforms = payload.data.len()))]
pub async fn update_version_data(
    manager: ReleaseManager,
    State(state): State<AppState>,
    ActionJson(payload): ActionJson<UpdateVersionDataRequest>,
) -> Result<Json<StatusResponse>, ActionError> {
    releases::replace_platform_table(&state.records, payload.data).await?;
    Ok(Json(StatusResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/update_eula",
    tag = "Admin",
    operation_id = "updateEula",
    summary = "Replace the EULA",
    description = "Stores a new EULA version and text. The version is sanitized; the text is stored verbatim, HTML included. Requires `release:manage`.",
    request_body = UpdateEulaRequest,
    responses(
        (status = 200, description = "EULA replaced (`OK`)", body = StatusResponse),
        (status = 400, description = "Body missing or malformed (`invalid message`)", body = StatusResponse),
        (status = 403, description = "Missing token or permission (`insufficient permissions`)", body = StatusResponse),
        (status = 500, description = "Storage failure (`storage error`)", body = StatusResponse),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, manager, payload), fields(subject = %manager.0.subject))]
pub async fn update_eula(
    manager: ReleaseManager,
    State(state): State<AppState>,
    ActionJson(payload): ActionJson<UpdateEulaRequest>,
) -> Result<Json<StatusResponse>, ActionError> {
    releases::replace_eula(&state.records, &payload.version, &payload.text).await?;
    Ok(Json(StatusResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/purge",
    tag = "Admin",
    operation_id = "purge",
    summary = "Delete all tracker options",
    description = "Deletes every stored option: fields of every platform ever published, both platform lists, the EULA and the service version. Requires `release:manage`.",
    responses(
        (status = 200, description = "Options deleted", body = PurgeResponse),
        (status = 403, description = "Missing token or permission (`insufficient permissions`)", body = StatusResponse),
        (status = 500, description = "Storage failure (`storage error`)", body = StatusResponse),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, manager), fields(subject = %manager.0.subject))]
pub async fn purge(
    manager: ReleaseManager,
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, ActionError> {
    let removed = state.records.purge().await?;
    info!(removed, "Purged tracker options");
    Ok(Json(PurgeResponse {
        status: STATUS_OK.into(),
        removed,
    }))
}
