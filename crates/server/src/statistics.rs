//! Statistics API endpoints

use api_types::stats::{Statistic, StatsGet};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

/// Handle requests for a vehicle's cached statistics
pub async fn get_stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<StatsGet>,
) -> Result<Json<Statistic>, ServerError> {
    let engine = state.engine.read().await;
    let stats = engine.statistics(&payload.vehicle_id, &user.username)?;

    Ok(Json(Statistic {
        fill_up_count: stats.fill_up_count,
        total_gallons: stats.total_gallons,
        total_cost: stats.total_cost,
        total_miles: stats.total_miles,
        average_mpg: stats.average_mpg(),
        average_cost_per_mile: stats.average_cost_per_mile(),
        last_odometer: stats.last_odometer,
    }))
}
