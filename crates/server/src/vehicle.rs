//! Vehicle API endpoints

use api_types::vehicle::{Vehicle, VehicleNew, VehicleView, VehiclesResponse};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for creating a new `Vehicle`
pub async fn vehicle_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<VehicleNew>,
) -> Result<Json<Vehicle>, ServerError> {
    let mut engine = state.engine.write().await;
    let vehicle_id = engine.new_vehicle(&payload.name, &user.username).await?;

    Ok(Json(Vehicle {
        id: Some(vehicle_id),
        name: Some(payload.name),
    }))
}

/// Handle requests for fetching a single vehicle, by id or name
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<Vehicle>,
) -> Result<Json<Vehicle>, ServerError> {
    if payload.id.is_none() && payload.name.is_none() {
        return Err(ServerError::Generic("id or name required".to_string()));
    }

    let engine = state.engine.read().await;
    let vehicle = engine.vehicle(payload.id.as_deref(), payload.name, &user.username)?;

    Ok(Json(Vehicle {
        id: Some(vehicle.id.clone()),
        name: Some(vehicle.name.clone()),
    }))
}

/// Handle requests for listing the user's vehicles
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<VehiclesResponse>, ServerError> {
    let engine = state.engine.read().await;
    let vehicles = engine
        .vehicles(&user.username)
        .into_iter()
        .map(|vehicle| VehicleView {
            id: vehicle.id.clone(),
            name: vehicle.name.clone(),
            record_count: vehicle.records.len(),
        })
        .collect();

    Ok(Json(VehiclesResponse { vehicles }))
}
