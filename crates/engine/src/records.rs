//! Fueling record primitives.
//!
//! A `FuelingRecord` is one fill-up event for a vehicle. The stored fields
//! are what the user entered; miles driven, MPG and cost per mile are
//! derived on demand and never persisted.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util};

/// One fueling event.
///
/// `total_cost ≈ price_per_gallon × gallons` is a soft invariant: the form
/// resolver keeps the three fields consistent while editing, but the engine
/// does not reject records where they drift (rounded receipts, discounts).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelingRecord {
    pub id: Uuid,
    pub vehicle_id: String,
    pub date: DateTime<Utc>,
    pub current_miles: f64,
    pub previous_miles: f64,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub total_cost: f64,
    /// Fill-up type: `true` for a partial fill, `false` for a full tank.
    pub partial: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FuelingRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        vehicle_id: String,
        date: DateTime<Utc>,
        current_miles: f64,
        previous_miles: f64,
        price_per_gallon: f64,
        gallons: f64,
        total_cost: f64,
        partial: bool,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        util::validate_fill_amounts(price_per_gallon, gallons, total_cost)?;
        util::validate_odometer(current_miles, previous_miles)?;

        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            date,
            current_miles,
            previous_miles,
            price_per_gallon,
            gallons,
            total_cost,
            partial,
            notes,
            created_at: Utc::now(),
        })
    }

    pub fn miles_driven(&self) -> f64 {
        self.current_miles - self.previous_miles
    }

    /// Miles per gallon for this tank, 0 when no gallons were recorded.
    pub fn mpg(&self) -> f64 {
        if self.gallons <= 0.0 {
            return 0.0;
        }
        self.miles_driven() / self.gallons
    }

    /// Cost per mile driven, 0 when no distance was covered.
    pub fn cost_per_mile(&self) -> f64 {
        let miles = self.miles_driven();
        if miles <= 0.0 {
            return 0.0;
        }
        self.total_cost / miles
    }

    /// Validated copy with the update applied. Id, owner and creation
    /// timestamp are preserved.
    pub fn with_update(&self, update: &FuelingRecordUpdate) -> ResultEngine<Self> {
        util::validate_fill_amounts(update.price_per_gallon, update.gallons, update.total_cost)?;
        util::validate_odometer(update.current_miles, update.previous_miles)?;

        Ok(Self {
            id: self.id,
            vehicle_id: self.vehicle_id.clone(),
            date: update.date,
            current_miles: update.current_miles,
            previous_miles: update.previous_miles,
            price_per_gallon: update.price_per_gallon,
            gallons: update.gallons,
            total_cost: update.total_cost,
            partial: update.partial,
            notes: update.notes.clone(),
            created_at: self.created_at,
        })
    }
}

/// Payload for creating a record.
///
/// `previous_miles` is optional: when absent the engine pre-fills it with
/// the vehicle's last odometer reading, as the entry form does.
#[derive(Clone, Debug, PartialEq)]
pub struct NewFuelingRecord {
    pub date: DateTime<Utc>,
    pub current_miles: f64,
    pub previous_miles: Option<f64>,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub partial: bool,
    pub notes: Option<String>,
}

/// Full replacement values for editing a record.
#[derive(Clone, Debug, PartialEq)]
pub struct FuelingRecordUpdate {
    pub date: DateTime<Utc>,
    pub current_miles: f64,
    pub previous_miles: f64,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub partial: bool,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fueling_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub date: DateTimeUtc,
    pub current_miles: f64,
    pub previous_miles: f64,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub partial: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
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

impl From<&FuelingRecord> for ActiveModel {
    fn from(record: &FuelingRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            vehicle_id: ActiveValue::Set(record.vehicle_id.clone()),
            date: ActiveValue::Set(record.date),
            current_miles: ActiveValue::Set(record.current_miles),
            previous_miles: ActiveValue::Set(record.previous_miles),
            price_per_gallon: ActiveValue::Set(record.price_per_gallon),
            gallons: ActiveValue::Set(record.gallons),
            total_cost: ActiveValue::Set(record.total_cost),
            partial: ActiveValue::Set(record.partial),
            notes: ActiveValue::Set(record.notes.clone()),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for FuelingRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "record")?,
            vehicle_id: model.vehicle_id,
            date: model.date,
            current_miles: model.current_miles,
            previous_miles: model.previous_miles,
            price_per_gallon: model.price_per_gallon,
            gallons: model.gallons,
            total_cost: model.total_cost,
            partial: model.partial,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
