use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod vehicle {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleNew {
        pub name: String,
    }

    /// Query parameters for fetching a single vehicle, by id or by name.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Vehicle {
        pub id: Option<String>,
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleView {
        pub id: String,
        pub name: String,
        pub record_count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehiclesResponse {
        pub vehicles: Vec<VehicleView>,
    }
}

pub mod record {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordNew {
        pub vehicle_id: String,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        pub current_miles: f64,
        /// Defaults to the vehicle's last odometer reading when absent.
        pub previous_miles: Option<f64>,
        pub price_per_gallon: f64,
        pub gallons: f64,
        pub total_cost: f64,
        pub is_partial_fill_up: bool,
        pub notes: Option<String>,
    }

    /// Full replacement values for editing a record.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordUpdate {
        pub vehicle_id: String,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        pub current_miles: f64,
        pub previous_miles: f64,
        pub price_per_gallon: f64,
        pub gallons: f64,
        pub total_cost: f64,
        pub is_partial_fill_up: bool,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordList {
        pub vehicle_id: String,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordDelete {
        pub vehicle_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordView {
        pub id: Uuid,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
        pub current_miles: f64,
        pub previous_miles: f64,
        pub price_per_gallon: f64,
        pub gallons: f64,
        pub total_cost: f64,
        pub is_partial_fill_up: bool,
        pub notes: Option<String>,
        // Derived, never stored.
        pub miles_driven: f64,
        pub mpg: f64,
        pub cost_per_mile: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecordListResponse {
        pub records: Vec<RecordView>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsGet {
        pub vehicle_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub fill_up_count: i64,
        pub total_gallons: f64,
        pub total_cost: f64,
        pub total_miles: f64,
        /// Average MPG over full fill-ups only.
        pub average_mpg: f64,
        pub average_cost_per_mile: f64,
        pub last_odometer: f64,
    }
}

pub mod imports {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExportGet {
        pub vehicle_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportNew {
        pub vehicle_id: String,
        /// A CSV document in the export format.
        pub data: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResult {
        pub imported: usize,
    }
}
