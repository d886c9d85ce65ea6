//! Calculation errors

use thiserror::Error;

use super::MeasurementField;

/// Errors that can occur while deriving a record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// A measurement was non-finite, could not be parsed, or (at the input
    /// collector) was negative. Derived values that overflow are reported
    /// against the input that produced them.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput {
        /// Measurement the value was supplied for
        field: MeasurementField,
        /// Human readable cause
        reason: String,
    },
}

impl CalcError {
    pub(crate) fn invalid(field: MeasurementField, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// The measurement the error refers to
    pub fn field(&self) -> MeasurementField {
        match self {
            CalcError::InvalidInput { field, .. } => *field,
        }
    }
}
