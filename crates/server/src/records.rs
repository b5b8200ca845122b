//! Fueling record API endpoints

use api_types::record::{
    RecordCreated, RecordDelete, RecordList, RecordListResponse, RecordNew, RecordUpdate,
    RecordView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{FuelingRecord, FuelingRecordUpdate, NewFuelingRecord};

fn record_view(record: &FuelingRecord) -> RecordView {
    RecordView {
        id: record.id,
        date: record.date.fixed_offset(),
        current_miles: record.current_miles,
        previous_miles: record.previous_miles,
        price_per_gallon: record.price_per_gallon,
        gallons: record.gallons,
        total_cost: record.total_cost,
        is_partial_fill_up: record.partial,
        notes: record.notes.clone(),
        miles_driven: record.miles_driven(),
        mpg: record.mpg(),
        cost_per_mile: record.cost_per_mile(),
    }
}

/// Handle requests for logging a fill-up
pub async fn record_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecordNew>,
) -> Result<Json<RecordCreated>, ServerError> {
    let new = NewFuelingRecord {
        date: payload.date.with_timezone(&Utc),
        current_miles: payload.current_miles,
        previous_miles: payload.previous_miles,
        price_per_gallon: payload.price_per_gallon,
        gallons: payload.gallons,
        total_cost: payload.total_cost,
        partial: payload.is_partial_fill_up,
        notes: payload.notes,
    };

    let mut engine = state.engine.write().await;
    let id = engine
        .add_record(&payload.vehicle_id, &user.username, new)
        .await?;

    Ok(Json(RecordCreated { id }))
}

/// Handle requests for listing a vehicle's records, newest first
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecordList>,
) -> Result<Json<RecordListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50) as usize;

    let engine = state.engine.read().await;
    let vehicle = engine.vehicle(Some(&payload.vehicle_id), None, &user.username)?;

    let mut records: Vec<&FuelingRecord> = vehicle.records.iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(Json(RecordListResponse {
        records: records.into_iter().take(limit).map(record_view).collect(),
    }))
}

/// Handle requests for editing a record
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordUpdate>,
) -> Result<Json<RecordView>, ServerError> {
    let update = FuelingRecordUpdate {
        date: payload.date.with_timezone(&Utc),
        current_miles: payload.current_miles,
        previous_miles: payload.previous_miles,
        price_per_gallon: payload.price_per_gallon,
        gallons: payload.gallons,
        total_cost: payload.total_cost,
        partial: payload.is_partial_fill_up,
        notes: payload.notes,
    };

    let mut engine = state.engine.write().await;
    engine
        .update_record(&payload.vehicle_id, id, &user.username, update)
        .await?;

    let record = engine.record(&payload.vehicle_id, id, &user.username)?;
    Ok(Json(record_view(record)))
}

/// Handle requests for deleting a record
pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordDelete>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine
        .delete_record(&payload.vehicle_id, id, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
