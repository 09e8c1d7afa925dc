use crate::property::ComparableSale;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ComparableImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate { row: usize, value: String },
}

impl std::fmt::Display for ComparableImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparableImportError::Io(err) => write!(f, "failed to read comparables export: {}", err),
            ComparableImportError::Csv(err) => write!(f, "invalid comparables CSV data: {}", err),
            ComparableImportError::InvalidDate { row, value } => write!(
                f,
                "row {} has an unreadable sale date '{}' (expected YYYY-MM-DD or RFC 3339)",
                row, value
            ),
        }
    }
}

impl std::error::Error for ComparableImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComparableImportError::Io(err) => Some(err),
            ComparableImportError::Csv(err) => Some(err),
            ComparableImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for ComparableImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ComparableImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads comparable sales from a market-data CSV export with a header row.
pub fn comparables_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<ComparableSale>, ComparableImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut comparables = Vec::new();

    for (index, record) in csv_reader.deserialize::<ComparableRow>().enumerate() {
        let row = record?;
        let sale_date = match row.sale_date.as_deref() {
            Some(raw) => Some(parse_sale_date(raw).ok_or_else(|| {
                ComparableImportError::InvalidDate {
                    row: index + 1,
                    value: raw.to_string(),
                }
            })?),
            None => None,
        };

        comparables.push(ComparableSale {
            address: row.address,
            sale_price: row.sale_price,
            sale_date,
            square_feet: row.square_feet,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            year_built: row.year_built,
            property_type: row.property_type,
        });
    }

    Ok(comparables)
}

pub fn comparables_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ComparableSale>, ComparableImportError> {
    let file = File::open(path)?;
    comparables_from_reader(file)
}

#[derive(Debug, Deserialize)]
struct ComparableRow {
    address: String,
    sale_price: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sale_date: Option<String>,
    square_feet: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    bathrooms: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    year_built: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    property_type: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match empty_string_as_none(deserializer)? {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
