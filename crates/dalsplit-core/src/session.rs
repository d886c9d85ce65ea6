//! Entry session
//!
//! Holds the current form state. Every measurement change recomputes the
//! whole [`DerivedRecord`] and replaces it; nothing is updated in place.

use chrono::NaiveDate;

use crate::calc::{CalcError, DerivedRecord, MeasurementField, Measurements};
use crate::input::{check_measurement, parse_measurement, GaadiType, ReportMeta};

/// A single edit to the form
#[derive(Debug, Clone, PartialEq)]
pub enum InputChange {
    /// New value for one measurement (grams)
    Measurement(MeasurementField, f64),
    /// New sample date
    Date(NaiveDate),
    /// New vehicle number
    VehicleNumber(String),
    /// New party name
    PartyName(String),
    /// New gaadi type
    GaadiType(GaadiType),
}

/// Current inputs plus the record derived from them
#[derive(Debug, Clone)]
pub struct Session {
    meta: ReportMeta,
    measurements: Measurements,
    record: DerivedRecord,
}

impl Session {
    /// Start an empty session (all measurements zero)
    pub fn new(meta: ReportMeta) -> Self {
        Self {
            meta,
            measurements: Measurements::default(),
            record: DerivedRecord::default(),
        }
    }

    /// Start a session from existing measurements
    pub fn with_measurements(meta: ReportMeta, measurements: Measurements) -> Result<Self, CalcError> {
        let record = measurements.derive()?;
        Ok(Self {
            meta,
            measurements,
            record,
        })
    }

    /// Apply one change.
    ///
    /// Measurement changes are validated like form input; an invalid value
    /// leaves the session untouched.
    pub fn apply(&mut self, change: InputChange) -> Result<(), CalcError> {
        match change {
            InputChange::Measurement(field, value) => {
                let value = check_measurement(field, value)?;
                let next = self.measurements.with(field, value);
                self.record = next.derive()?;
                self.measurements = next;
                tracing::debug!(%field, value, "measurement changed, record recomputed");
            }
            InputChange::Date(date) => self.meta.date = date,
            InputChange::VehicleNumber(v) => self.meta.vehicle_number = v,
            InputChange::PartyName(p) => self.meta.party_name = p,
            InputChange::GaadiType(g) => self.meta.gaadi_type = g,
        }
        Ok(())
    }

    /// Apply a textual measurement edit (empty text = 0)
    pub fn apply_text(&mut self, field: MeasurementField, text: &str) -> Result<(), CalcError> {
        let value = parse_measurement(field, text)?;
        self.apply(InputChange::Measurement(field, value))
    }

    /// Current metadata
    pub fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    /// Current measurements
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Record derived from the current measurements
    pub fn record(&self) -> &DerivedRecord {
        &self.record
    }
}
