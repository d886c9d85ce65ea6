//! PDF report
//!
//! Two A4 pages:
//! 1. landscape photo page (the uploaded image, or a notice when there is none)
//! 2. portrait sheet page: company header box, party/date/vehicle/gaadi
//!    cells, and the grams | percentage table.

mod fonts;
mod image;
mod writer;

pub use fonts::Font;
pub use image::{load_image, ColorSpace, ImageError, ImageFilter, PdfImage};
pub use writer::{escape_text, mm_to_pt, Align, ImageId, Orientation, Page, PdfDocument, POINTS_PER_MM};

use super::{sheet_rows, Presenter, ReportError, ReportImage};
use crate::calc::{display_value, DerivedRecord};
use crate::config::ReportConfig;
use crate::input::ReportMeta;

/// Page margin used on both pages, millimetres
const MARGIN: f32 = 10.0;

/// Height of a table row, millimetres
const ROW_H: f32 = 8.0;

/// Line height of text inside table rows, millimetres
const TEXT_H: f32 = 4.0;

/// Offset of text from the top-left corner of a table cell, millimetres
const TEXT_INSET: f32 = 2.0;

/// Body font size, points
const BODY_SIZE: f32 = 10.0;

/// Renders the two-page split report
#[derive(Debug, Clone)]
pub struct PdfPresenter {
    /// Company name in the header box
    pub company_name: String,
    /// Report title under the company name
    pub report_title: String,
}

impl Default for PdfPresenter {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl PdfPresenter {
    /// Presenter using the branding from `config`
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            company_name: config.company_name.clone(),
            report_title: config.report_title.clone(),
        }
    }

    /// Lay out the document without serializing it
    pub fn build(
        &self,
        record: &DerivedRecord,
        meta: &ReportMeta,
        image: Option<&ReportImage>,
    ) -> Result<PdfDocument, ReportError> {
        let mut doc = PdfDocument::new();
        doc.set_title(format!("{} - {}", self.report_title, meta.display_date()));

        let photo = self.photo_page(&mut doc, image)?;
        doc.add_page(photo);
        doc.add_page(self.sheet_page(record, meta)?);
        Ok(doc)
    }

    fn photo_page(&self, doc: &mut PdfDocument, image: Option<&ReportImage>) -> Result<Page, ReportError> {
        let mut page = Page::new(Orientation::Landscape);
        let full_w = page.width() - 2.0 * MARGIN;

        let Some(image) = image else {
            page.set_font(Font::Bold, 18.0);
            page.cell(MARGIN, MARGIN, full_w, 10.0, "No Image Provided", Align::Center)?;
            return Ok(page);
        };

        match load_image(&image.bytes) {
            Ok(img) => {
                // Fit to the page width; shrink further if the photo is tall
                let max_h = page.height() - 2.0 * MARGIN;
                let mut w = full_w;
                let mut h = w * img.aspect_ratio();
                if h > max_h {
                    h = max_h;
                    w = h / img.aspect_ratio();
                }
                let id = doc.add_image(img);
                page.image(id, MARGIN, MARGIN, w, h)?;
            }
            Err(e) => {
                tracing::warn!(
                    source = ?image.source,
                    "image could not be embedded, writing error page: {e}"
                );
                page.set_font(Font::Bold, 16.0);
                page.cell(MARGIN, MARGIN, full_w, 10.0, &format!("Image error: {e}"), Align::Center)?;
            }
        }
        Ok(page)
    }

    fn sheet_page(&self, record: &DerivedRecord, meta: &ReportMeta) -> Result<Page, ReportError> {
        let mut page = Page::new(Orientation::Portrait);
        let inner_w = page.width() - 2.0 * MARGIN;

        // Header box with company name and report title
        let box_x = 20.0;
        let box_y = 10.0;
        let box_w = page.width() - 40.0;
        page.rect(box_x, box_y, box_w, 14.0)?;
        page.set_font(Font::Bold, 14.0);
        page.cell(box_x, box_y + 1.0, box_w, 6.0, &self.company_name, Align::Center)?;
        page.set_font(Font::Regular, 12.0);
        page.cell(box_x, box_y + 7.0, box_w, 6.0, &self.report_title, Align::Center)?;

        // Metadata: two rows of two cells
        page.set_font(Font::Regular, BODY_SIZE);
        let col_w = inner_w / 2.0;
        let mut y = box_y + 7.0 + 6.0 + 6.0;
        let meta_rows = [
            (
                format!("PARTY NAME : {}", meta.party_name),
                format!("DATE : {}", meta.display_date()),
            ),
            (
                format!("VEHICLE NUMBER : {}", meta.vehicle_number),
                format!("GAADI TYPE : {}", meta.gaadi_type),
            ),
        ];
        for (left, right) in &meta_rows {
            page.rect(MARGIN, y, col_w, ROW_H)?;
            page.rect(MARGIN + col_w, y, col_w, ROW_H)?;
            page.cell(MARGIN + TEXT_INSET, y + TEXT_INSET, col_w - 2.0 * TEXT_INSET, TEXT_H, left, Align::Left)?;
            page.cell(
                MARGIN + col_w + TEXT_INSET,
                y + TEXT_INSET,
                col_w - 2.0 * TEXT_INSET,
                TEXT_H,
                right,
                Align::Left,
            )?;
            y += ROW_H + 4.0;
        }
        y += 4.0;

        // Main table
        let table_y = y;
        page.set_font(Font::Bold, BODY_SIZE);
        page.rect(MARGIN, y, inner_w, ROW_H)?;
        page.cell(
            MARGIN + TEXT_INSET,
            y + TEXT_INSET,
            col_w - 2.0 * TEXT_INSET,
            TEXT_H,
            "INDIVIDUAL PARTICLE DATA (in gram)",
            Align::Left,
        )?;
        page.cell(
            MARGIN + col_w + TEXT_INSET,
            y + TEXT_INSET,
            col_w - 2.0 * TEXT_INSET,
            TEXT_H,
            "INDIVIDUAL PARTICLE DATA (in percentage)",
            Align::Left,
        )?;
        y += ROW_H;

        for row in sheet_rows(record) {
            let label = row.kind.report_label();
            let font = if row.kind.is_total() { Font::Bold } else { Font::Regular };
            page.set_font(font, BODY_SIZE);
            page.rect(MARGIN, y, col_w, ROW_H)?;
            page.rect(MARGIN + col_w, y, col_w, ROW_H)?;
            page.multi_cell(
                MARGIN + TEXT_INSET,
                y + TEXT_INSET,
                col_w - 2.0 * TEXT_INSET,
                TEXT_H,
                &format!("{label} : {} gm", display_value(row.grams)),
            )?;
            page.multi_cell(
                MARGIN + col_w + TEXT_INSET,
                y + TEXT_INSET,
                col_w - 2.0 * TEXT_INSET,
                TEXT_H,
                &format!("{label} : {} %", display_value(row.pct)),
            )?;
            y += ROW_H;
        }

        page.rect(MARGIN, table_y, inner_w, y - table_y)?;
        Ok(page)
    }
}

impl Presenter for PdfPresenter {
    fn render(
        &self,
        record: &DerivedRecord,
        meta: &ReportMeta,
        image: Option<&ReportImage>,
    ) -> Result<Vec<u8>, ReportError> {
        let bytes = self.build(record, meta, image)?.to_bytes()?;
        tracing::debug!(bytes = bytes.len(), with_image = image.is_some(), "pdf report rendered");
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}
