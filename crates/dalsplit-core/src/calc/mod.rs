//! Calculation Engine
//!
//! Turns the six raw measurements of a dal sample into the sheet grams,
//! percentages and totals printed on the split report.
//!
//! The engine is a pure function. Every step is rounded to three decimal
//! places as soon as it is produced (doubling, ×10, then each sum), so the
//! result matches previously printed sheets digit for digit. Rounding once at
//! the end would give different last digits for some inputs.
//!
//! Negative inputs are not rejected here; the sign propagates through every
//! field. Non-finite inputs are rejected with [`CalcError::InvalidInput`].

mod error;
mod record;
mod rounding;

pub use error::CalcError;
pub use record::{DerivedRecord, MeasurementField, Measurements, UnknownFieldError};
pub use rounding::{display_value, round3, round_dp, DECIMAL_PLACES};

/// Sheet grams are recorded at twice the weighed sample
pub const SHEET_FACTOR: f64 = 2.0;

/// Percentage per sheet gram (the sheet sample is 10 g)
pub const PERCENT_FACTOR: f64 = 10.0;

/// Compute the derived record from six raw measurements (grams).
///
/// ```
/// use dalsplit_core::calc::compute_derived;
///
/// let record = compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0).unwrap();
/// assert_eq!(record.grand_total_g, 7.75);
/// assert_eq!(record.total6_pct, 77.5);
/// ```
pub fn compute_derived(
    daal: f64,
    tukdi: f64,
    red_black: f64,
    chhala: f64,
    dankhal: f64,
    mesh14: f64,
) -> Result<DerivedRecord, CalcError> {
    derive(&Measurements::new(daal, tukdi, red_black, chhala, dankhal, mesh14))
}

/// Compute the derived record for a [`Measurements`] set
pub fn derive(input: &Measurements) -> Result<DerivedRecord, CalcError> {
    if let Some((field, value)) = input.iter().find(|(_, v)| !v.is_finite()) {
        return Err(CalcError::invalid(field, format!("{value} is not a finite number")));
    }

    let raw_sum = round3(
        input.daal + input.tukdi + input.red_black + input.chhala + input.dankhal + input.mesh14,
    );

    let daal_g = round3(input.daal * SHEET_FACTOR);
    let tukdi_g = round3(input.tukdi * SHEET_FACTOR);
    let red_black_g = round3(input.red_black * SHEET_FACTOR);
    let chhala_g = round3(input.chhala * SHEET_FACTOR);
    let dankhal_g = round3(input.dankhal * SHEET_FACTOR);
    let mesh14_g = round3(input.mesh14 * SHEET_FACTOR);

    let grand_total_g = round3(daal_g + tukdi_g + red_black_g + chhala_g + dankhal_g + mesh14_g);

    let daal_pct = round3(daal_g * PERCENT_FACTOR);
    let tukdi_pct = round3(tukdi_g * PERCENT_FACTOR);
    let red_black_pct = round3(red_black_g * PERCENT_FACTOR);
    let chhala_pct = round3(chhala_g * PERCENT_FACTOR);
    let dankhal_pct = round3(dankhal_g * PERCENT_FACTOR);
    let mesh14_pct = round3(mesh14_g * PERCENT_FACTOR);

    let total_dal_tukdi_pct = round3(daal_pct + tukdi_pct);
    let total4_pct = round3(red_black_pct + chhala_pct + dankhal_pct + mesh14_pct);
    let total6_pct = round3(total_dal_tukdi_pct + total4_pct);

    let total_dal_tukdi_g = round3(daal_g + tukdi_g);
    let total4_g = round3(red_black_g + chhala_g + dankhal_g + mesh14_g);

    let record = DerivedRecord {
        raw_sum,
        daal_g,
        tukdi_g,
        red_black_g,
        chhala_g,
        dankhal_g,
        mesh14_g,
        grand_total_g,
        daal_pct,
        tukdi_pct,
        red_black_pct,
        chhala_pct,
        dankhal_pct,
        mesh14_pct,
        total_dal_tukdi_g,
        total_dal_tukdi_pct,
        total4_g,
        total4_pct,
        total6_pct,
    };

    if let Some((name, _)) = record.values().into_iter().find(|(_, v)| !v.is_finite()) {
        // Blame the largest input; it is the one that pushed the sum out of range.
        let field = input
            .iter()
            .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
            .map(|(field, _)| field)
            .unwrap_or(MeasurementField::Daal);
        return Err(CalcError::invalid(
            field,
            format!("derived value {name} overflows a double"),
        ));
    }

    tracing::trace!(
        raw_sum = record.raw_sum,
        grand_total_g = record.grand_total_g,
        total6_pct = record.total6_pct,
        "derived record computed"
    );

    Ok(record)
}

impl Measurements {
    /// Compute the derived record for these measurements
    pub fn derive(&self) -> Result<DerivedRecord, CalcError> {
        derive(self)
    }
}
