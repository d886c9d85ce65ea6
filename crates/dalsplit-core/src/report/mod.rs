//! Report presentation
//!
//! The derived record is consumed by interchangeable [`Presenter`]s:
//!
//! - [`TablePresenter`] - plain text preview table
//! - [`JsonPresenter`] - machine readable output
//! - [`PdfPresenter`] - two-page A4 report (photo page + sheet page)
//!
//! All presenters lay out the same nine sheet rows, see [`sheet_rows`].

mod json;
mod naming;
pub mod pdf;
mod table;

pub use json::JsonPresenter;
pub use naming::{report_file_name, slugify};
pub use pdf::PdfPresenter;
pub use table::TablePresenter;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calc::{CalcError, DerivedRecord, MeasurementField};
use crate::input::ReportMeta;

/// Errors that can occur while rendering or saving a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Calculation error: {0}")]
    Calc(#[from] CalcError),
}

/// A presentation adapter for derived records
pub trait Presenter {
    /// Render the record, its metadata and an optional photo to bytes
    fn render(
        &self,
        record: &DerivedRecord,
        meta: &ReportMeta,
        image: Option<&ReportImage>,
    ) -> Result<Vec<u8>, ReportError>;

    /// File extension of the rendered output (without the dot)
    fn extension(&self) -> &'static str;

    /// Render and write to `path`
    fn write_to(
        &self,
        path: &Path,
        record: &DerivedRecord,
        meta: &ReportMeta,
        image: Option<&ReportImage>,
    ) -> Result<(), ReportError> {
        let bytes = self.render(record, meta, image)?;
        fs::write(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "report written");
        Ok(())
    }
}

/// An uploaded photo for the first report page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportImage {
    /// Raw file contents (JPEG or PNG)
    pub bytes: Vec<u8>,
    /// Where the image came from, if known
    pub source: Option<PathBuf>,
}

impl ReportImage {
    /// Wrap in-memory image bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            source: None,
        }
    }

    /// Read an image file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        Ok(Self {
            bytes: fs::read(path)?,
            source: Some(path.to_path_buf()),
        })
    }
}

/// What a sheet row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A single measurement
    Field(MeasurementField),
    /// Daal + Tukdi
    TotalDalTukdi,
    /// Red/Black + Chhala + Dankhal + 14 Mesh
    Total4,
    /// Everything
    GrandTotal,
}

impl RowKind {
    /// Label in the preview table
    pub fn label(&self) -> &'static str {
        match self {
            RowKind::Field(field) => field.label(),
            RowKind::TotalDalTukdi => "Total (Dal+Tukdi)",
            RowKind::Total4 => "Total (4)",
            RowKind::GrandTotal => "Grand Total for Sheet",
        }
    }

    /// Label on the printed report
    pub fn report_label(&self) -> &'static str {
        match self {
            RowKind::Field(field) => field.report_label(),
            RowKind::TotalDalTukdi => "TOTAL ( DAAL + TUKDI )",
            RowKind::Total4 => "TOTAL ( R/B + C + D + 14# )",
            RowKind::GrandTotal => "GRAND TOTAL",
        }
    }

    /// Totals are printed in bold
    pub fn is_total(&self) -> bool {
        !matches!(self, RowKind::Field(_))
    }
}

/// One row of the sheet: grams and percentage side by side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetRow {
    /// Row content
    pub kind: RowKind,
    /// Sheet grams
    pub grams: f64,
    /// Percentage
    pub pct: f64,
}

/// The nine sheet rows in print order. The grand total row pairs the sheet
/// grams total with the six-fraction percentage total.
pub fn sheet_rows(record: &DerivedRecord) -> [SheetRow; 9] {
    let field = |f: MeasurementField| SheetRow {
        kind: RowKind::Field(f),
        grams: record.grams(f),
        pct: record.pct(f),
    };
    [
        field(MeasurementField::Daal),
        field(MeasurementField::Tukdi),
        SheetRow {
            kind: RowKind::TotalDalTukdi,
            grams: record.total_dal_tukdi_g,
            pct: record.total_dal_tukdi_pct,
        },
        field(MeasurementField::RedBlack),
        field(MeasurementField::Chhala),
        field(MeasurementField::Dankhal),
        field(MeasurementField::Mesh14),
        SheetRow {
            kind: RowKind::Total4,
            grams: record.total4_g,
            pct: record.total4_pct,
        },
        SheetRow {
            kind: RowKind::GrandTotal,
            grams: record.grand_total_g,
            pct: record.total6_pct,
        },
    ]
}

/// Flat view of everything printed on the report, keyed like the sheet
/// template placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReportData {
    /// `DD/MM/YYYY`
    pub date: String,
    /// Vehicle number
    pub vehicle: String,
    /// Party name
    pub party: String,
    /// Gaadi type literal
    pub gaadi: String,
    /// Daal sheet grams
    pub daal: f64,
    /// Tukdi sheet grams
    pub tukdi: f64,
    /// Total (Dal+Tukdi) grams
    #[serde(rename = "TOTAL_DTG")]
    pub total_dtg: f64,
    /// Total (Dal+Tukdi) percentage
    #[serde(rename = "TOTAL_DTP")]
    pub total_dtp: f64,
    /// Red/Black sheet grams
    #[serde(rename = "REDBLACK")]
    pub red_black: f64,
    /// Chhala sheet grams
    pub chhala: f64,
    /// Dankhal sheet grams
    pub dankhal: f64,
    /// 14 Mesh sheet grams
    #[serde(rename = "MES14")]
    pub mesh14: f64,
    /// Total (4) grams
    #[serde(rename = "TOTAL_4_GRAMS")]
    pub total4_grams: f64,
    /// Total (4) percentage
    #[serde(rename = "TOTAL_4")]
    pub total4: f64,
    /// Grand total sheet grams
    pub grand_total: f64,
    /// Six-fraction percentage total
    #[serde(rename = "TOTAL_6")]
    pub total6: f64,
    /// Daal percentage
    pub daal_perc: f64,
    /// Tukdi percentage
    pub tukdi_perc: f64,
    /// Red/Black percentage
    #[serde(rename = "REDBLACK_PERC")]
    pub red_black_perc: f64,
    /// Chhala percentage
    pub chhala_perc: f64,
    /// Dankhal percentage
    pub dankhal_perc: f64,
    /// 14 Mesh percentage
    #[serde(rename = "MES14_PERC")]
    pub mesh14_perc: f64,
}

impl ReportData {
    /// Collect the printable values
    pub fn new(record: &DerivedRecord, meta: &ReportMeta) -> Self {
        Self {
            date: meta.display_date(),
            vehicle: meta.vehicle_number.clone(),
            party: meta.party_name.clone(),
            gaadi: meta.gaadi_type.to_string(),
            daal: record.daal_g,
            tukdi: record.tukdi_g,
            total_dtg: record.total_dal_tukdi_g,
            total_dtp: record.total_dal_tukdi_pct,
            red_black: record.red_black_g,
            chhala: record.chhala_g,
            dankhal: record.dankhal_g,
            mesh14: record.mesh14_g,
            total4_grams: record.total4_g,
            total4: record.total4_pct,
            grand_total: record.grand_total_g,
            total6: record.total6_pct,
            daal_perc: record.daal_pct,
            tukdi_perc: record.tukdi_pct,
            red_black_perc: record.red_black_pct,
            chhala_perc: record.chhala_pct,
            dankhal_perc: record.dankhal_pct,
            mesh14_perc: record.mesh14_pct,
        }
    }
}
