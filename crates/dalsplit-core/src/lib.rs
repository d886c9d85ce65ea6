//! # Dal Split Core Library
//!
//! Core functionality for the Dal Split calculator.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The calculation engine that turns six weighed fractions of a dal sample
//!   into sheet grams, percentages and totals
//! - Input parsing for the entry form fields
//! - An entry session that recomputes on every change
//! - Report presenters: text preview, JSON and a two-page PDF
//! - Report configuration
//!
//! ## Example
//!
//! ```rust
//! use dalsplit_core::prelude::*;
//!
//! let record = compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0)?;
//! assert_eq!(record.total_dal_tukdi_g, 6.0);
//! assert_eq!(record.total4_pct, 17.5);
//!
//! let meta = ReportMeta::today().with_party("Shree Traders");
//! let preview = TablePresenter::default().render_string(&record, &meta)?;
//! assert!(preview.contains("Grand Total for Sheet"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calc;
pub mod config;
pub mod input;
pub mod report;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::calc::{
        compute_derived, CalcError, DerivedRecord, MeasurementField, Measurements,
    };
    pub use crate::config::ReportConfig;
    pub use crate::input::{parse_measurement, GaadiType, ReportMeta};
    pub use crate::report::{
        report_file_name, JsonPresenter, PdfPresenter, Presenter, ReportError, ReportImage,
        TablePresenter,
    };
    pub use crate::session::{InputChange, Session};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
