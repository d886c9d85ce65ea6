//! Plain text preview table

use std::fmt::{self, Write};

use super::{sheet_rows, Presenter, ReportError, ReportImage};
use crate::calc::{display_value, DerivedRecord};
use crate::input::ReportMeta;

/// Renders the on-screen preview: the raw input total followed by an aligned
/// Item | Grams | Percent table.
#[derive(Debug, Clone, Default)]
pub struct TablePresenter {
    /// Optional heading printed above the table
    pub title: Option<String>,
    /// Include the metadata block (date, party, vehicle, gaadi)
    pub show_meta: bool,
}

impl TablePresenter {
    /// Preview with metadata and a heading
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            show_meta: true,
        }
    }

    /// Render to a `String`
    pub fn render_string(&self, record: &DerivedRecord, meta: &ReportMeta) -> Result<String, ReportError> {
        let mut out = String::new();
        self.write_table(&mut out, record, meta)?;
        Ok(out)
    }

    /// Write the preview to any text sink
    pub fn write_table<W: Write>(&self, out: &mut W, record: &DerivedRecord, meta: &ReportMeta) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(out, "{title}")?;
            writeln!(out, "{}", "=".repeat(title.chars().count()))?;
        }

        if self.show_meta {
            writeln!(out, "Date:         {}", meta.display_date())?;
            writeln!(out, "Vehicle:      {}", meta.vehicle_number)?;
            writeln!(out, "Party:        {}", meta.party_name)?;
            writeln!(out, "Gaadi Type:   {}", meta.gaadi_type)?;
            writeln!(out)?;
        }

        writeln!(out, "Grand total (inputs): {} g", display_value(record.raw_sum))?;
        writeln!(out)?;

        let rows: Vec<[String; 3]> = sheet_rows(record)
            .iter()
            .map(|row| {
                [
                    row.kind.label().to_string(),
                    display_value(row.grams),
                    display_value(row.pct),
                ]
            })
            .collect();

        let header = ["Item", "Grams", "Percent"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(
            out,
            "{:<w0$} | {:>w1$} | {:>w2$}",
            header[0],
            header[1],
            header[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )?;
        writeln!(
            out,
            "{}-+-{}-+-{}",
            "-".repeat(widths[0]),
            "-".repeat(widths[1]),
            "-".repeat(widths[2])
        )?;
        for [item, grams, pct] in &rows {
            writeln!(
                out,
                "{:<w0$} | {:>w1$} | {:>w2$}",
                item,
                grams,
                pct,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2]
            )?;
        }
        Ok(())
    }
}

impl Presenter for TablePresenter {
    fn render(
        &self,
        record: &DerivedRecord,
        meta: &ReportMeta,
        _image: Option<&ReportImage>,
    ) -> Result<Vec<u8>, ReportError> {
        Ok(self.render_string(record, meta)?.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::compute_derived;
    use chrono::NaiveDate;

    #[test]
    fn test_table_layout() {
        let record = compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0).unwrap();
        let meta = ReportMeta::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let text = TablePresenter::default().render_string(&record, &meta).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Grand total (inputs): 3.875 g");
        assert!(lines[2].starts_with("Item"));
        // header, rule, nine rows
        assert_eq!(lines.len(), 2 + 2 + 9);
        assert!(lines[4].starts_with("Daal"));
        assert!(lines[4].ends_with("20.0"));
        assert!(lines[12].starts_with("Grand Total for Sheet"));
        assert!(lines[12].contains("7.75"));
        assert!(lines[12].ends_with("77.5"));

        // all rows share the column separator positions
        let bar = lines[2].find('|').unwrap();
        assert!(lines[4..].iter().all(|l| l.find('|') == Some(bar)));
    }

    #[test]
    fn test_table_with_meta() {
        let record = compute_derived(0.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        let meta = ReportMeta::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()).with_vehicle("MH12");
        let text = TablePresenter::with_title("Aravally Dal Split").render_string(&record, &meta).unwrap();
        assert!(text.starts_with("Aravally Dal Split\n=================="));
        assert!(text.contains("Date:         30/06/2024"));
        assert!(text.contains("Vehicle:      MH12"));
        assert!(text.contains("Grand total (inputs): 0.0 g"));
    }

    /// Sink that refuses writes once `left` bytes are used up
    struct Limited {
        left: usize,
    }

    impl fmt::Write for Limited {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.left = self.left.checked_sub(s.len()).ok_or(fmt::Error)?;
            Ok(())
        }
    }

    #[test]
    fn test_sink_errors_propagate() {
        let record = compute_derived(1.0, 2.0, 0.5, 0.25, 0.125, 0.0).unwrap();
        let meta = ReportMeta::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let presenter = TablePresenter::with_title("Aravally Dal Split");

        let mut sink = Limited { left: 40 };
        assert_eq!(presenter.write_table(&mut sink, &record, &meta), Err(fmt::Error));

        let mut sink = Limited { left: 4096 };
        assert_eq!(presenter.write_table(&mut sink, &record, &meta), Ok(()));
    }
}
