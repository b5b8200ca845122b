//! The module contains the errors the engine can throw.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid reading: {0}")]
    InvalidReading(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid csv: {0}")]
    InvalidCsv(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidReading(a), Self::InvalidReading(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCsv(a), Self::InvalidCsv(b)) => a == b,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
