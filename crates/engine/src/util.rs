//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Validate the three fill amounts. NaN fails every comparison, so the
/// `!(x > 0.0)` form rejects it as well.
pub(crate) fn validate_fill_amounts(
    price_per_gallon: f64,
    gallons: f64,
    total_cost: f64,
) -> ResultEngine<()> {
    if !(price_per_gallon > 0.0) || !price_per_gallon.is_finite() {
        return Err(EngineError::InvalidAmount(
            "price_per_gallon must be > 0".to_string(),
        ));
    }
    if !(gallons > 0.0) || !gallons.is_finite() {
        return Err(EngineError::InvalidAmount("gallons must be > 0".to_string()));
    }
    if !(total_cost > 0.0) || !total_cost.is_finite() {
        return Err(EngineError::InvalidAmount(
            "total_cost must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Validate the odometer pair: non-negative and strictly increasing.
pub(crate) fn validate_odometer(current_miles: f64, previous_miles: f64) -> ResultEngine<()> {
    if !(previous_miles >= 0.0) || !previous_miles.is_finite() {
        return Err(EngineError::InvalidReading(
            "previous_miles must be >= 0".to_string(),
        ));
    }
    if !current_miles.is_finite() || current_miles <= previous_miles {
        return Err(EngineError::InvalidReading(
            "current_miles must exceed previous_miles".to_string(),
        ));
    }
    Ok(())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("invalid {label} id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan_amounts() {
        assert!(validate_fill_amounts(f64::NAN, 1.0, 1.0).is_err());
        assert!(validate_fill_amounts(1.0, f64::NAN, 1.0).is_err());
        assert!(validate_fill_amounts(1.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn rejects_non_increasing_odometer() {
        assert!(validate_odometer(100.0, 100.0).is_err());
        assert!(validate_odometer(99.0, 100.0).is_err());
        assert!(validate_odometer(100.5, 100.0).is_ok());
    }
}
