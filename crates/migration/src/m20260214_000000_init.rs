//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `vehicles`: cars owned by users
//! - `fueling_records`: one row per fill-up
//! - `vehicle_stats`: denormalized per-vehicle statistics, maintained by
//!   the engine on every write

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    Name,
    UserId,
}

#[derive(Iden)]
enum FuelingRecords {
    Table,
    Id,
    VehicleId,
    Date,
    CurrentMiles,
    PreviousMiles,
    PricePerGallon,
    Gallons,
    TotalCost,
    Partial,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum VehicleStats {
    Table,
    VehicleId,
    FillUpCount,
    TotalGallons,
    TotalCost,
    TotalMiles,
    MeteredMiles,
    MeteredGallons,
    LastOdometer,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Vehicles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Name).string().not_null())
                    .col(ColumnDef::new(Vehicles::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicles-user_id")
                            .from(Vehicles::Table, Vehicles::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicles-user_id-name-unique")
                    .table(Vehicles::Table)
                    .col(Vehicles::UserId)
                    .col(Vehicles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Fueling records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FuelingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelingRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FuelingRecords::VehicleId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelingRecords::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(FuelingRecords::CurrentMiles)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelingRecords::PreviousMiles)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelingRecords::PricePerGallon)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelingRecords::Gallons).double().not_null())
                    .col(
                        ColumnDef::new(FuelingRecords::TotalCost)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelingRecords::Partial)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelingRecords::Notes).string())
                    .col(
                        ColumnDef::new(FuelingRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fueling_records-vehicle_id")
                            .from(FuelingRecords::Table, FuelingRecords::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fueling_records-vehicle_id-date")
                    .table(FuelingRecords::Table)
                    .col(FuelingRecords::VehicleId)
                    .col(FuelingRecords::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Vehicle statistics
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(VehicleStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VehicleStats::VehicleId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VehicleStats::FillUpCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleStats::TotalGallons)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VehicleStats::TotalCost).double().not_null())
                    .col(
                        ColumnDef::new(VehicleStats::TotalMiles)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleStats::MeteredMiles)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleStats::MeteredGallons)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VehicleStats::LastOdometer)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vehicle_stats-vehicle_id")
                            .from(VehicleStats::Table, VehicleStats::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VehicleStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FuelingRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
