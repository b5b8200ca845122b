//! CSV encoding and decoding of fueling records.
//!
//! Row format:
//! `date,currentMiles,previousMiles,pricePerGallon,gallons,totalCost,isPartialFillUp,notes`
//! with RFC 3339 dates. Quoting and escaping of the notes field is handled
//! by the `csv` crate.

use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, records::FuelingRecord};

/// One CSV row. Field order matches the exported header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRecord {
    pub date: DateTime<Utc>,
    pub current_miles: f64,
    pub previous_miles: f64,
    pub price_per_gallon: f64,
    pub gallons: f64,
    pub total_cost: f64,
    pub is_partial_fill_up: bool,
    pub notes: Option<String>,
}

impl From<&FuelingRecord> for CsvRecord {
    fn from(record: &FuelingRecord) -> Self {
        Self {
            date: record.date,
            current_miles: record.current_miles,
            previous_miles: record.previous_miles,
            price_per_gallon: record.price_per_gallon,
            gallons: record.gallons,
            total_cost: record.total_cost,
            is_partial_fill_up: record.partial,
            notes: record.notes.clone(),
        }
    }
}

/// Serialize records into a CSV document with a header row.
pub fn write_records<'a, I>(records: I) -> ResultEngine<String>
where
    I: IntoIterator<Item = &'a FuelingRecord>,
{
    let mut writer = Writer::from_writer(vec![]);
    for record in records {
        writer.serialize(CsvRecord::from(record))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| EngineError::InvalidCsv(err.to_string()))?;
    String::from_utf8(data).map_err(|err| EngineError::InvalidCsv(err.to_string()))
}

/// Parse a CSV document produced by [`write_records`] (or a compatible
/// export). Rows are returned in document order; validation against the
/// record invariants happens when the rows are turned into records.
pub fn read_records(data: &str) -> ResultEngine<Vec<CsvRecord>> {
    let mut reader = Reader::from_reader(data.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize::<CsvRecord>() {
        rows.push(row?);
    }
    Ok(rows)
}
