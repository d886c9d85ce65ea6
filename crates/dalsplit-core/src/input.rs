//! Input collection
//!
//! Parses the textual form fields into [`Measurements`] and [`ReportMeta`].
//! The collector is stricter than the engine: like the entry form it only
//! accepts values `>= 0`, and it rounds every measurement to three places.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::calc::{round3, CalcError, MeasurementField, Measurements};

/// Display format for dates on the report (`DD/MM/YYYY`)
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format used in report file names (`YYYY-MM-DD`)
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse one measurement field.
///
/// Empty text counts as zero. Unparseable, non-finite and negative values are
/// rejected with [`CalcError::InvalidInput`].
pub fn parse_measurement(field: MeasurementField, text: &str) -> Result<f64, CalcError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = text
        .parse()
        .map_err(|_| CalcError::invalid(field, format!("'{text}' is not a decimal number")))?;

    check_measurement(field, value)
}

/// Validate an already numeric measurement the way the form does
pub fn check_measurement(field: MeasurementField, value: f64) -> Result<f64, CalcError> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, format!("{value} is not a finite number")));
    }
    if value < 0.0 {
        return Err(CalcError::invalid(field, format!("{value} is negative")));
    }
    Ok(round3(value))
}

/// Parse all six measurements from `(field, text)` pairs.
///
/// Fields that are not listed stay at zero. The first invalid field aborts.
pub fn parse_measurements<'a, I>(fields: I) -> Result<Measurements, CalcError>
where
    I: IntoIterator<Item = (MeasurementField, &'a str)>,
{
    let mut measurements = Measurements::default();
    for (field, text) in fields {
        measurements.set(field, parse_measurement(field, text)?);
    }
    Ok(measurements)
}

/// Load/vehicle condition recorded on the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GaadiType {
    /// Standing load
    #[default]
    Khadi,
    /// Full load
    Poori,
}

impl GaadiType {
    /// Both values, in form order
    pub const ALL: [GaadiType; 2] = [GaadiType::Khadi, GaadiType::Poori];

    /// Literal shown on the form and report
    pub fn as_str(&self) -> &'static str {
        match self {
            GaadiType::Khadi => "Khadi",
            GaadiType::Poori => "Poori",
        }
    }
}

impl fmt::Display for GaadiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a gaadi type is neither Khadi nor Poori
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown gaadi type '{0}' (expected Khadi or Poori)")]
pub struct ParseGaadiTypeError(pub String);

impl FromStr for GaadiType {
    type Err = ParseGaadiTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "khadi" => Ok(GaadiType::Khadi),
            "poori" => Ok(GaadiType::Poori),
            _ => Err(ParseGaadiTypeError(s.to_string())),
        }
    }
}

/// Metadata printed on the report. Passed through unchanged by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Sample date
    pub date: NaiveDate,
    /// Vehicle registration, free text
    #[serde(default)]
    pub vehicle_number: String,
    /// Party (supplier) name, free text
    #[serde(default)]
    pub party_name: String,
    /// Load condition
    #[serde(default)]
    pub gaadi_type: GaadiType,
}

impl ReportMeta {
    /// Create metadata for a date with empty text fields
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            vehicle_number: String::new(),
            party_name: String::new(),
            gaadi_type: GaadiType::default(),
        }
    }

    /// Metadata dated today (local time)
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Set the vehicle number
    pub fn with_vehicle(mut self, vehicle_number: impl Into<String>) -> Self {
        self.vehicle_number = vehicle_number.into();
        self
    }

    /// Set the party name
    pub fn with_party(mut self, party_name: impl Into<String>) -> Self {
        self.party_name = party_name.into();
        self
    }

    /// Set the gaadi type
    pub fn with_gaadi_type(mut self, gaadi_type: GaadiType) -> Self {
        self.gaadi_type = gaadi_type;
        self
    }

    /// Date as printed on the report (`DD/MM/YYYY`)
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// Date as used in file names (`YYYY-MM-DD`)
    pub fn file_date(&self) -> String {
        self.date.format(FILE_DATE_FORMAT).to_string()
    }
}
