//! Measurement input and derived record types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the six weighed fractions of a dal sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementField {
    /// Whole split dal
    Daal,
    /// Broken pieces
    Tukdi,
    /// Red and black grains
    RedBlack,
    /// Husk
    Chhala,
    /// Unsplit grain
    Dankhal,
    /// Fines passing a 14 mesh sieve
    Mesh14,
}

impl MeasurementField {
    /// All fields in sheet order
    pub const ALL: [MeasurementField; 6] = [
        MeasurementField::Daal,
        MeasurementField::Tukdi,
        MeasurementField::RedBlack,
        MeasurementField::Chhala,
        MeasurementField::Dankhal,
        MeasurementField::Mesh14,
    ];

    /// Stable snake_case key, used for CLI flags and config files
    pub fn key(&self) -> &'static str {
        match self {
            MeasurementField::Daal => "daal",
            MeasurementField::Tukdi => "tukdi",
            MeasurementField::RedBlack => "red_black",
            MeasurementField::Chhala => "chhala",
            MeasurementField::Dankhal => "dankhal",
            MeasurementField::Mesh14 => "mesh14",
        }
    }

    /// Label shown in the preview table
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementField::Daal => "Daal",
            MeasurementField::Tukdi => "Tukdi",
            MeasurementField::RedBlack => "Red/Black",
            MeasurementField::Chhala => "Chhala",
            MeasurementField::Dankhal => "Dankhal",
            MeasurementField::Mesh14 => "14 Mesh",
        }
    }

    /// Label printed on the report page
    pub fn report_label(&self) -> &'static str {
        match self {
            MeasurementField::Daal => "DAAL",
            MeasurementField::Tukdi => "TUKDI",
            MeasurementField::RedBlack => "RED / BLACK",
            MeasurementField::Chhala => "CHHALA",
            MeasurementField::Dankhal => "DANKHAL",
            MeasurementField::Mesh14 => "14 MESH",
        }
    }

    /// True for the four fractions summed into "Total (4)"
    pub fn is_minor(&self) -> bool {
        !matches!(self, MeasurementField::Daal | MeasurementField::Tukdi)
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a measurement name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown measurement '{0}' (expected one of daal, tukdi, red_black, chhala, dankhal, mesh14)")]
pub struct UnknownFieldError(pub String);

impl FromStr for MeasurementField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MeasurementField::ALL
            .into_iter()
            .find(|field| {
                field.key() == wanted
                    || field.label().to_lowercase() == wanted
                    || field.report_label().to_lowercase() == wanted
                    || field.key().replace('_', "-") == wanted
            })
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

/// The six raw measurements in grams. Absent values are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurements {
    /// Daal, grams
    pub daal: f64,
    /// Tukdi, grams
    pub tukdi: f64,
    /// Red/Black, grams
    pub red_black: f64,
    /// Chhala, grams
    pub chhala: f64,
    /// Dankhal, grams
    pub dankhal: f64,
    /// 14 Mesh, grams
    pub mesh14: f64,
}

impl Measurements {
    /// Create from six values in sheet order
    pub fn new(daal: f64, tukdi: f64, red_black: f64, chhala: f64, dankhal: f64, mesh14: f64) -> Self {
        Self {
            daal,
            tukdi,
            red_black,
            chhala,
            dankhal,
            mesh14,
        }
    }

    /// Create from optional values; `None` counts as zero
    pub fn from_options(
        daal: Option<f64>,
        tukdi: Option<f64>,
        red_black: Option<f64>,
        chhala: Option<f64>,
        dankhal: Option<f64>,
        mesh14: Option<f64>,
    ) -> Self {
        Self::new(
            daal.unwrap_or_default(),
            tukdi.unwrap_or_default(),
            red_black.unwrap_or_default(),
            chhala.unwrap_or_default(),
            dankhal.unwrap_or_default(),
            mesh14.unwrap_or_default(),
        )
    }

    /// Value of one field
    pub fn get(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Daal => self.daal,
            MeasurementField::Tukdi => self.tukdi,
            MeasurementField::RedBlack => self.red_black,
            MeasurementField::Chhala => self.chhala,
            MeasurementField::Dankhal => self.dankhal,
            MeasurementField::Mesh14 => self.mesh14,
        }
    }

    /// Replace one field
    pub fn set(&mut self, field: MeasurementField, value: f64) {
        let slot = match field {
            MeasurementField::Daal => &mut self.daal,
            MeasurementField::Tukdi => &mut self.tukdi,
            MeasurementField::RedBlack => &mut self.red_black,
            MeasurementField::Chhala => &mut self.chhala,
            MeasurementField::Dankhal => &mut self.dankhal,
            MeasurementField::Mesh14 => &mut self.mesh14,
        };
        *slot = value;
    }

    /// Builder-style [`Measurements::set`]
    pub fn with(mut self, field: MeasurementField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Iterate `(field, value)` pairs in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (MeasurementField, f64)> + '_ {
        MeasurementField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// Everything computed from one set of [`Measurements`].
///
/// Each field is rounded to three decimal places on its own, after the step
/// that produced it. Serialized field names follow the sheet naming
/// (`daalG`, `total4Pct`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRecord {
    /// Sum of the six raw inputs
    pub raw_sum: f64,

    /// Daal sheet grams (input × 2)
    pub daal_g: f64,
    /// Tukdi sheet grams
    pub tukdi_g: f64,
    /// Red/Black sheet grams
    pub red_black_g: f64,
    /// Chhala sheet grams
    pub chhala_g: f64,
    /// Dankhal sheet grams
    pub dankhal_g: f64,
    /// 14 Mesh sheet grams
    pub mesh14_g: f64,
    /// Sum of the six sheet gram values
    pub grand_total_g: f64,

    /// Daal percentage (sheet grams × 10)
    pub daal_pct: f64,
    /// Tukdi percentage
    pub tukdi_pct: f64,
    /// Red/Black percentage
    pub red_black_pct: f64,
    /// Chhala percentage
    pub chhala_pct: f64,
    /// Dankhal percentage
    pub dankhal_pct: f64,
    /// 14 Mesh percentage
    pub mesh14_pct: f64,

    /// Daal + Tukdi sheet grams
    pub total_dal_tukdi_g: f64,
    /// Daal + Tukdi percentage
    pub total_dal_tukdi_pct: f64,
    /// Red/Black + Chhala + Dankhal + 14 Mesh sheet grams
    pub total4_g: f64,
    /// Red/Black + Chhala + Dankhal + 14 Mesh percentage
    pub total4_pct: f64,
    /// Total (Dal+Tukdi) % + Total (4) %
    pub total6_pct: f64,
}

impl DerivedRecord {
    /// Sheet grams for one field
    pub fn grams(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Daal => self.daal_g,
            MeasurementField::Tukdi => self.tukdi_g,
            MeasurementField::RedBlack => self.red_black_g,
            MeasurementField::Chhala => self.chhala_g,
            MeasurementField::Dankhal => self.dankhal_g,
            MeasurementField::Mesh14 => self.mesh14_g,
        }
    }

    /// Percentage for one field
    pub fn pct(&self, field: MeasurementField) -> f64 {
        match field {
            MeasurementField::Daal => self.daal_pct,
            MeasurementField::Tukdi => self.tukdi_pct,
            MeasurementField::RedBlack => self.red_black_pct,
            MeasurementField::Chhala => self.chhala_pct,
            MeasurementField::Dankhal => self.dankhal_pct,
            MeasurementField::Mesh14 => self.mesh14_pct,
        }
    }

    /// All numeric fields with their sheet names, in declaration order
    pub fn values(&self) -> [(&'static str, f64); 19] {
        [
            ("rawSum", self.raw_sum),
            ("daalG", self.daal_g),
            ("tukdiG", self.tukdi_g),
            ("redBlackG", self.red_black_g),
            ("chhalaG", self.chhala_g),
            ("dankhalG", self.dankhal_g),
            ("mesh14G", self.mesh14_g),
            ("grandTotalG", self.grand_total_g),
            ("daalPct", self.daal_pct),
            ("tukdiPct", self.tukdi_pct),
            ("redBlackPct", self.red_black_pct),
            ("chhalaPct", self.chhala_pct),
            ("dankhalPct", self.dankhal_pct),
            ("mesh14Pct", self.mesh14_pct),
            ("totalDalTukdiG", self.total_dal_tukdi_g),
            ("totalDalTukdiPct", self.total_dal_tukdi_pct),
            ("total4G", self.total4_g),
            ("total4Pct", self.total4_pct),
            ("total6Pct", self.total6_pct),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parsing() {
        assert_eq!("daal".parse::<MeasurementField>(), Ok(MeasurementField::Daal));
        assert_eq!("Red/Black".parse::<MeasurementField>(), Ok(MeasurementField::RedBlack));
        assert_eq!("red-black".parse::<MeasurementField>(), Ok(MeasurementField::RedBlack));
        assert_eq!("14 MESH".parse::<MeasurementField>(), Ok(MeasurementField::Mesh14));
        assert!("gravel".parse::<MeasurementField>().is_err());
    }

    #[test]
    fn test_measurements_get_set() {
        let mut m = Measurements::default();
        for (i, field) in MeasurementField::ALL.into_iter().enumerate() {
            m.set(field, i as f64);
        }
        assert_eq!(m.daal, 0.0);
        assert_eq!(m.mesh14, 5.0);
        assert_eq!(m.get(MeasurementField::Chhala), 3.0);
        assert_eq!(m.iter().count(), 6);
    }

    #[test]
    fn test_from_options_treats_none_as_zero() {
        let m = Measurements::from_options(Some(1.5), None, None, Some(0.25), None, None);
        assert_eq!(m, Measurements::new(1.5, 0.0, 0.0, 0.25, 0.0, 0.0));
    }

    #[test]
    fn test_record_serializes_with_sheet_names() {
        let record = DerivedRecord {
            total4_g: 1.75,
            ..Default::default()
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["total4G"], 1.75);
        assert!(json.get("redBlackPct").is_some());
        assert!(json.get("totalDalTukdiG").is_some());
        assert_eq!(record.values().len(), 19);
    }

    #[test]
    fn test_minor_fields() {
        let minor: Vec<_> = MeasurementField::ALL
            .into_iter()
            .filter(MeasurementField::is_minor)
            .collect();
        assert_eq!(minor.len(), 4);
        assert!(!minor.contains(&MeasurementField::Daal));
    }
}
