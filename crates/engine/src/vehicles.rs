//! The `Vehicle` owns the fueling records and the statistics cache for one
//! car. A user can have multiple vehicles.

use sea_orm::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine,
    error::EngineError,
    records::{FuelingRecord, FuelingRecordUpdate},
    stats::VehicleStats,
};

/// A vehicle with its record history and cached statistics.
#[derive(Debug)]
pub struct Vehicle {
    /// Stable identifier, a UUID generated once and persisted, so the
    /// vehicle can be renamed without breaking references.
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub records: Vec<FuelingRecord>,
    pub stats: VehicleStats,
}

impl Vehicle {
    pub fn new(name: String, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            user_id: user_id.to_string(),
            records: Vec::new(),
            stats: VehicleStats::default(),
        }
    }

    /// Insert a record, folding it into the statistics incrementally.
    pub fn add_record(&mut self, record: FuelingRecord) -> &FuelingRecord {
        self.stats.apply_record(&record);
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn record(&self, id: &Uuid) -> ResultEngine<&FuelingRecord> {
        self.records
            .iter()
            .find(|record| record.id == *id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Replace a record's fields and rebuild the statistics from scratch.
    pub fn update_record(
        &mut self,
        id: &Uuid,
        update: &FuelingRecordUpdate,
    ) -> ResultEngine<&FuelingRecord> {
        match self.records.iter().position(|record| record.id == *id) {
            Some(index) => {
                let updated = self.records[index].with_update(update)?;
                self.records[index] = updated;
                self.stats = VehicleStats::recompute(&self.records);
                Ok(&self.records[index])
            }
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    /// Remove a record and rebuild the statistics from scratch.
    pub fn delete_record(&mut self, id: &Uuid) -> ResultEngine<FuelingRecord> {
        match self.records.iter().position(|record| record.id == *id) {
            Some(index) => {
                let record = self.records.remove(index);
                self.stats = VehicleStats::recompute(&self.records);
                Ok(record)
            }
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    /// Highest odometer reading seen, used to pre-fill the previous-miles
    /// field on the next entry.
    pub fn last_odometer(&self) -> f64 {
        self.stats.last_odometer
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::records::Entity")]
    FuelingRecords,
    #[sea_orm(has_one = "super::stats::Entity")]
    VehicleStats,
}

impl Related<super::records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelingRecords.def()
    }
}

impl Related<super::stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vehicle> for ActiveModel {
    fn from(value: &Vehicle) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            user_id: ActiveValue::Set(value.user_id.clone()),
        }
    }
}
