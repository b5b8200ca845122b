//! CSV export/import API endpoints

use api_types::imports::{ExportGet, ImportNew, ImportResult};
use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for exporting a vehicle's records as CSV
pub async fn export(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExportGet>,
) -> Result<Response, ServerError> {
    let engine = state.engine.read().await;
    let data = engine.export_csv(&payload.vehicle_id, &user.username)?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], data).into_response())
}

/// Handle requests for importing records from a CSV document
pub async fn import(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ImportNew>,
) -> Result<Json<ImportResult>, ServerError> {
    let mut engine = state.engine.write().await;
    let imported = engine
        .import_csv(&payload.vehicle_id, &user.username, &payload.data)
        .await?;

    Ok(Json(ImportResult {
        imported: imported.len(),
    }))
}
