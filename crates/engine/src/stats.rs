//! Per-vehicle statistics cache.
//!
//! The stored row keeps running totals so reads never scan the record
//! table. Inserts update the totals incrementally; edits and deletions go
//! through a full recompute, which is accepted as the simpler path for an
//! infrequent operation. The two paths must agree: folding `apply_record`
//! over a record set yields the same totals as `recompute` over it.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::records::FuelingRecord;

/// Running totals for one vehicle.
///
/// `metered_*` accumulate only full fill-ups: after a partial fill the tank
/// level is unknown, so that tank's consumption cannot be measured and it
/// is left out of the MPG average. Partial fills still count toward the
/// plain totals.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleStats {
    pub fill_up_count: i64,
    pub total_gallons: f64,
    pub total_cost: f64,
    pub total_miles: f64,
    pub metered_miles: f64,
    pub metered_gallons: f64,
    pub last_odometer: f64,
}

impl VehicleStats {
    /// Fold one record into the totals ("record added" path).
    pub fn apply_record(&mut self, record: &FuelingRecord) {
        self.fill_up_count += 1;
        self.total_gallons += record.gallons;
        self.total_cost += record.total_cost;
        self.total_miles += record.miles_driven();
        if !record.partial {
            self.metered_miles += record.miles_driven();
            self.metered_gallons += record.gallons;
        }
        if record.current_miles > self.last_odometer {
            self.last_odometer = record.current_miles;
        }
    }

    /// Rebuild the totals from scratch ("record edited" path).
    pub fn recompute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FuelingRecord>,
    {
        let mut stats = Self::default();
        for record in records {
            stats.apply_record(record);
        }
        stats
    }

    /// Fleet-style average: metered miles over metered gallons, not the
    /// mean of per-record MPG values.
    pub fn average_mpg(&self) -> f64 {
        if self.metered_gallons <= 0.0 {
            return 0.0;
        }
        self.metered_miles / self.metered_gallons
    }

    pub fn average_cost_per_mile(&self) -> f64 {
        if self.total_miles <= 0.0 {
            return 0.0;
        }
        self.total_cost / self.total_miles
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicle_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vehicle_id: String,
    pub fill_up_count: i64,
    pub total_gallons: f64,
    pub total_cost: f64,
    pub total_miles: f64,
    pub metered_miles: f64,
    pub metered_gallons: f64,
    pub last_odometer: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Vehicles,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&VehicleStats> for ActiveModel {
    fn from(stats: &VehicleStats) -> Self {
        Self {
            vehicle_id: ActiveValue::NotSet,
            fill_up_count: ActiveValue::Set(stats.fill_up_count),
            total_gallons: ActiveValue::Set(stats.total_gallons),
            total_cost: ActiveValue::Set(stats.total_cost),
            total_miles: ActiveValue::Set(stats.total_miles),
            metered_miles: ActiveValue::Set(stats.metered_miles),
            metered_gallons: ActiveValue::Set(stats.metered_gallons),
            last_odometer: ActiveValue::Set(stats.last_odometer),
        }
    }
}

impl From<Model> for VehicleStats {
    fn from(model: Model) -> Self {
        Self {
            fill_up_count: model.fill_up_count,
            total_gallons: model.total_gallons,
            total_cost: model.total_cost,
            total_miles: model.total_miles,
            metered_miles: model.metered_miles,
            metered_gallons: model.metered_gallons,
            last_odometer: model.last_odometer,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn record(previous: f64, current: f64, gallons: f64, cost: f64, partial: bool) -> FuelingRecord {
        FuelingRecord::new(
            "vehicle".to_string(),
            Utc.timestamp_opt(0, 0).unwrap(),
            current,
            previous,
            cost / gallons,
            gallons,
            cost,
            partial,
            None,
        )
        .unwrap()
    }

    #[test]
    fn incremental_matches_recompute() {
        let records = vec![
            record(10_000.0, 10_300.0, 10.0, 35.0, false),
            record(10_300.0, 10_450.0, 6.0, 21.0, true),
            record(10_450.0, 10_800.0, 11.5, 40.0, false),
        ];

        let mut incremental = VehicleStats::default();
        for record in &records {
            incremental.apply_record(record);
        }

        assert_eq!(incremental, VehicleStats::recompute(&records));
    }

    #[test]
    fn partial_fills_are_excluded_from_mpg() {
        let stats = VehicleStats::recompute(&[
            record(10_000.0, 10_300.0, 10.0, 35.0, false),
            record(10_300.0, 10_450.0, 6.0, 21.0, true),
        ]);

        assert_eq!(stats.fill_up_count, 2);
        assert_eq!(stats.total_miles, 450.0);
        assert_eq!(stats.total_gallons, 16.0);
        // Only the full fill contributes to the average.
        assert_eq!(stats.average_mpg(), 30.0);
    }

    #[test]
    fn averages_are_zero_when_empty() {
        let stats = VehicleStats::default();

        assert_eq!(stats.average_mpg(), 0.0);
        assert_eq!(stats.average_cost_per_mile(), 0.0);
    }

    #[test]
    fn cost_per_mile_spans_all_fills() {
        let stats = VehicleStats::recompute(&[
            record(0.0, 100.0, 5.0, 20.0, false),
            record(100.0, 200.0, 5.0, 30.0, true),
        ]);

        assert_eq!(stats.average_cost_per_mile(), 0.25);
        assert_eq!(stats.last_odometer, 200.0);
    }
}
