use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

pub use error::EngineError;
pub use exports::CsvRecord;
pub use records::{FuelingRecord, FuelingRecordUpdate, NewFuelingRecord};
pub use resolver::{FillUpField, FillUpForm};
pub use stats::VehicleStats;
pub use vehicles::Vehicle;

mod error;
mod exports;
mod records;
mod resolver;
mod stats;
mod util;
mod vehicles;

type ResultEngine<T> = Result<T, EngineError>;

/// The logical core: every vehicle with its records and cached statistics,
/// kept in memory and backed by the database. Mutations write the database
/// transaction first and touch the in-memory state only after commit.
#[derive(Debug)]
pub struct Engine {
    vehicles: HashMap<String, Vehicle>,
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn vehicle_mut(&mut self, vehicle_id: &str, user_id: &str) -> ResultEngine<&mut Vehicle> {
        match self.vehicles.get_mut(vehicle_id) {
            Some(vehicle) => {
                if vehicle.user_id != user_id {
                    return Err(EngineError::KeyNotFound("vehicle not exists".to_string()));
                }
                Ok(vehicle)
            }
            None => Err(EngineError::KeyNotFound(vehicle_id.to_string())),
        }
    }

    /// Return a user's `Vehicle` by id or by name.
    pub fn vehicle(
        &self,
        vehicle_id: Option<&str>,
        vehicle_name: Option<String>,
        user_id: &str,
    ) -> ResultEngine<&Vehicle> {
        if vehicle_id.is_none() && vehicle_name.is_none() {
            return Err(EngineError::KeyNotFound(
                "missing vehicle id or name".to_string(),
            ));
        }

        let vehicle = if let Some(id) = vehicle_id {
            match self.vehicles.get(id) {
                Some(vehicle) if vehicle.user_id == user_id => vehicle,
                _ => return Err(EngineError::KeyNotFound("vehicle not exists".to_string())),
            }
        } else {
            match vehicle_name.and_then(|name| {
                self.vehicles
                    .values()
                    .find(|vehicle| vehicle.name == name && vehicle.user_id == user_id)
            }) {
                Some(vehicle) => vehicle,
                None => return Err(EngineError::KeyNotFound("vehicle not exists".to_string())),
            }
        };

        Ok(vehicle)
    }

    /// List a user's vehicles, sorted by name.
    pub fn vehicles(&self, user_id: &str) -> Vec<&Vehicle> {
        let mut vehicles: Vec<&Vehicle> = self
            .vehicles
            .values()
            .filter(|vehicle| vehicle.user_id == user_id)
            .collect();
        vehicles.sort_by(|a, b| a.name.cmp(&b.name));
        vehicles
    }

    /// Add a new vehicle together with its (empty) statistics row.
    pub async fn new_vehicle(&mut self, name: &str, user_id: &str) -> ResultEngine<String> {
        if self
            .vehicles
            .values()
            .any(|vehicle| vehicle.user_id == user_id && vehicle.name == name)
        {
            return Err(EngineError::ExistingKey(name.to_string()));
        }

        let vehicle = Vehicle::new(name.to_string(), user_id);
        let vehicle_id = vehicle.id.clone();

        let db_tx = self.database.begin().await?;
        vehicles::ActiveModel::from(&vehicle).insert(&db_tx).await?;
        let mut stats_model: stats::ActiveModel = (&vehicle.stats).into();
        stats_model.vehicle_id = ActiveValue::Set(vehicle_id.clone());
        stats_model.insert(&db_tx).await?;
        db_tx.commit().await?;

        self.vehicles.insert(vehicle_id.clone(), vehicle);
        Ok(vehicle_id)
    }

    /// Log a fill-up.
    ///
    /// When `previous_miles` is absent the vehicle's last odometer reading
    /// is used, matching the pre-filled entry form. The statistics row is
    /// updated incrementally in the same database transaction.
    pub async fn add_record(
        &mut self,
        vehicle_id: &str,
        user_id: &str,
        new: NewFuelingRecord,
    ) -> ResultEngine<Uuid> {
        let (record, new_stats) = {
            let vehicle = self.vehicle(Some(vehicle_id), None, user_id)?;
            let previous_miles = new.previous_miles.unwrap_or_else(|| vehicle.last_odometer());
            let record = FuelingRecord::new(
                vehicle.id.clone(),
                new.date,
                new.current_miles,
                previous_miles,
                new.price_per_gallon,
                new.gallons,
                new.total_cost,
                new.partial,
                new.notes,
            )?;

            let mut stats = vehicle.stats.clone();
            stats.apply_record(&record);
            (record, stats)
        };

        let db_tx = self.database.begin().await?;
        records::ActiveModel::from(&record).insert(&db_tx).await?;
        self.persist_stats(&db_tx, vehicle_id, &new_stats).await?;
        db_tx.commit().await?;

        let record_id = record.id;
        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        vehicle.add_record(record);
        Ok(record_id)
    }

    /// Edit a record. The statistics cache is fully recomputed for the
    /// vehicle; edits are infrequent enough that the simpler path wins.
    pub async fn update_record(
        &mut self,
        vehicle_id: &str,
        record_id: Uuid,
        user_id: &str,
        update: FuelingRecordUpdate,
    ) -> ResultEngine<()> {
        let (updated, new_stats) = {
            let vehicle = self.vehicle(Some(vehicle_id), None, user_id)?;
            let updated = vehicle.record(&record_id)?.with_update(&update)?;
            let new_stats = VehicleStats::recompute(vehicle.records.iter().map(|record| {
                if record.id == record_id {
                    &updated
                } else {
                    record
                }
            }));
            (updated, new_stats)
        };

        let db_tx = self.database.begin().await?;
        records::ActiveModel::from(&updated).update(&db_tx).await?;
        self.persist_stats(&db_tx, vehicle_id, &new_stats).await?;
        db_tx.commit().await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        vehicle.update_record(&record_id, &update)?;
        Ok(())
    }

    /// Delete a record, recomputing the statistics like an edit does.
    pub async fn delete_record(
        &mut self,
        vehicle_id: &str,
        record_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        let new_stats = {
            let vehicle = self.vehicle(Some(vehicle_id), None, user_id)?;
            vehicle.record(&record_id)?;
            VehicleStats::recompute(
                vehicle
                    .records
                    .iter()
                    .filter(|record| record.id != record_id),
            )
        };

        let db_tx = self.database.begin().await?;
        records::Entity::delete_by_id(record_id.to_string())
            .exec(&db_tx)
            .await?;
        self.persist_stats(&db_tx, vehicle_id, &new_stats).await?;
        db_tx.commit().await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        vehicle.delete_record(&record_id)?;
        Ok(())
    }

    /// Return a record.
    pub fn record(
        &self,
        vehicle_id: &str,
        record_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<&FuelingRecord> {
        self.vehicle(Some(vehicle_id), None, user_id)?
            .record(&record_id)
    }

    /// Return the cached statistics for a vehicle.
    pub fn statistics(&self, vehicle_id: &str, user_id: &str) -> ResultEngine<&VehicleStats> {
        Ok(&self.vehicle(Some(vehicle_id), None, user_id)?.stats)
    }

    /// Rebuild the denormalized statistics row from the record rows.
    ///
    /// Repair entry point: the cache is maintained on every write, but if
    /// the stored row ever drifts this reloads the records from the
    /// database and rewrites both the row and the in-memory state.
    pub async fn recompute_statistics(
        &mut self,
        vehicle_id: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        self.vehicle(Some(vehicle_id), None, user_id)?;

        let record_models = records::Entity::find()
            .filter(records::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_asc(records::Column::Date)
            .all(&self.database)
            .await?;

        let mut loaded = Vec::with_capacity(record_models.len());
        for model in record_models {
            loaded.push(FuelingRecord::try_from(model)?);
        }
        let new_stats = VehicleStats::recompute(&loaded);

        let db_tx = self.database.begin().await?;
        self.persist_stats(&db_tx, vehicle_id, &new_stats).await?;
        db_tx.commit().await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        vehicle.records = loaded;
        vehicle.stats = new_stats;
        Ok(())
    }

    /// Export a vehicle's records as a CSV document, oldest first.
    pub fn export_csv(&self, vehicle_id: &str, user_id: &str) -> ResultEngine<String> {
        let vehicle = self.vehicle(Some(vehicle_id), None, user_id)?;
        let mut records: Vec<&FuelingRecord> = vehicle.records.iter().collect();
        records.sort_by(|a, b| a.date.cmp(&b.date));
        exports::write_records(records)
    }

    /// Import records from a CSV document in the export format.
    ///
    /// Every row is validated with the same rules as [`Engine::add_record`];
    /// one bad row rejects the whole import, and nothing is written until
    /// all rows pass.
    pub async fn import_csv(
        &mut self,
        vehicle_id: &str,
        user_id: &str,
        data: &str,
    ) -> ResultEngine<Vec<Uuid>> {
        let rows = exports::read_records(data)?;

        let (imported, new_stats) = {
            let vehicle = self.vehicle(Some(vehicle_id), None, user_id)?;
            let mut stats = vehicle.stats.clone();
            let mut imported = Vec::with_capacity(rows.len());
            for (index, row) in rows.into_iter().enumerate() {
                let record = FuelingRecord::new(
                    vehicle.id.clone(),
                    row.date,
                    row.current_miles,
                    row.previous_miles,
                    row.price_per_gallon,
                    row.gallons,
                    row.total_cost,
                    row.is_partial_fill_up,
                    row.notes,
                )
                .map_err(|err| EngineError::InvalidCsv(format!("row {}: {err}", index + 1)))?;
                stats.apply_record(&record);
                imported.push(record);
            }
            (imported, stats)
        };

        let db_tx = self.database.begin().await?;
        for record in &imported {
            records::ActiveModel::from(record).insert(&db_tx).await?;
        }
        self.persist_stats(&db_tx, vehicle_id, &new_stats).await?;
        db_tx.commit().await?;

        let vehicle = self.vehicle_mut(vehicle_id, user_id)?;
        let mut ids = Vec::with_capacity(imported.len());
        for record in imported {
            ids.push(record.id);
            vehicle.add_record(record);
        }
        Ok(ids)
    }

    async fn persist_stats(
        &self,
        db_tx: &DatabaseTransaction,
        vehicle_id: &str,
        stats: &VehicleStats,
    ) -> ResultEngine<()> {
        let mut model: stats::ActiveModel = stats.into();
        model.vehicle_id = ActiveValue::Set(vehicle_id.to_string());
        model.update(db_tx).await?;
        Ok(())
    }
}

/// The builder for `Engine`. Loads every vehicle with its records and
/// statistics from the database.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    pub async fn build(self) -> ResultEngine<Engine> {
        let mut vehicles = HashMap::new();

        let vehicle_models = vehicles::Entity::find().all(&self.database).await?;
        for vehicle_model in vehicle_models {
            let record_models = records::Entity::find()
                .filter(records::Column::VehicleId.eq(vehicle_model.id.clone()))
                .order_by_asc(records::Column::Date)
                .all(&self.database)
                .await?;

            let mut loaded = Vec::with_capacity(record_models.len());
            for model in record_models {
                loaded.push(FuelingRecord::try_from(model)?);
            }

            // The stats row is created with the vehicle; rebuild it from
            // the records if it is ever missing.
            let stats = match stats::Entity::find_by_id(vehicle_model.id.clone())
                .one(&self.database)
                .await?
            {
                Some(model) => VehicleStats::from(model),
                None => VehicleStats::recompute(&loaded),
            };

            vehicles.insert(
                vehicle_model.id.clone(),
                Vehicle {
                    id: vehicle_model.id,
                    name: vehicle_model.name,
                    user_id: vehicle_model.user_id,
                    records: loaded,
                    stats,
                },
            );
        }

        Ok(Engine {
            vehicles,
            database: self.database,
        })
    }
}
