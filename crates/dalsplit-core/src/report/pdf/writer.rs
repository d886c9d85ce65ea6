//! Minimal PDF writer
//!
//! Produces uncompressed PDF 1.5 files with the two standard Helvetica faces
//! and embedded images. Drawing coordinates are millimetres from the top-left
//! corner of the page; they are converted to PDF points (bottom-left origin)
//! when the content stream is written.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use super::fonts::Font;
use super::image::{ColorSpace, ImageFilter, PdfImage};

/// Points per millimetre (1 inch = 72 points = 25.4 mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// A4 short edge in millimetres
pub const A4_SHORT_MM: f32 = 210.0;

/// A4 long edge in millimetres
pub const A4_LONG_MM: f32 = 297.0;

/// Horizontal padding inside a cell, in millimetres
pub const CELL_MARGIN: f32 = 1.0;

/// Default stroke width, in millimetres
pub const LINE_WIDTH: f32 = 0.2;

/// Convert millimetres to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 210 × 297 mm
    Portrait,
    /// 297 × 210 mm
    Landscape,
}

/// Horizontal text alignment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left edge plus [`CELL_MARGIN`]
    #[default]
    Left,
    /// Centred
    Center,
    /// Right edge minus [`CELL_MARGIN`]
    Right,
}

/// Handle to an image registered with [`PdfDocument::add_image`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(usize);

/// One A4 page and its content stream
#[derive(Debug, Clone)]
pub struct Page {
    width: f32,
    height: f32,
    font: Font,
    font_size: f32,
    content: String,
    images: Vec<ImageId>,
}

impl Page {
    /// Blank A4 page
    pub fn new(orientation: Orientation) -> Self {
        let (width, height) = match orientation {
            Orientation::Portrait => (A4_SHORT_MM, A4_LONG_MM),
            Orientation::Landscape => (A4_LONG_MM, A4_SHORT_MM),
        };
        let content = format!("{} w\n", num(mm_to_pt(LINE_WIDTH)));
        Self {
            width,
            height,
            font: Font::Regular,
            font_size: 12.0,
            content,
            images: Vec::new(),
        }
    }

    /// Page width in millimetres
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height in millimetres
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Select the font for subsequent text
    pub fn set_font(&mut self, font: Font, size_pt: f32) {
        self.font = font;
        self.font_size = size_pt;
    }

    /// Width of `text` in the current font, millimetres
    pub fn string_width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.font_size) / POINTS_PER_MM
    }

    /// Stroke a rectangle
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> fmt::Result {
        writeln!(
            self.content,
            "{} {} {} {} re S",
            num(mm_to_pt(x)),
            num(mm_to_pt(self.height - y - h)),
            num(mm_to_pt(w)),
            num(mm_to_pt(h))
        )
    }

    /// Draw `text` with its baseline at `(x, baseline)`
    pub fn text(&mut self, x: f32, baseline: f32, text: &str) -> fmt::Result {
        writeln!(
            self.content,
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            self.font.resource_name(),
            num(self.font_size),
            num(mm_to_pt(x)),
            num(mm_to_pt(self.height - baseline)),
            escape_text(text)
        )
    }

    /// Draw a single line of text in a `w × h` box, vertically centred.
    /// Nothing is drawn for empty text.
    pub fn cell(&mut self, x: f32, y: f32, w: f32, h: f32, text: &str, align: Align) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }
        let text_w = self.string_width(text);
        let dx = match align {
            Align::Left => CELL_MARGIN,
            Align::Center => (w - text_w) / 2.0,
            Align::Right => w - CELL_MARGIN - text_w,
        };
        let font_size_mm = self.font_size / POINTS_PER_MM;
        let baseline = y + 0.5 * h + 0.3 * font_size_mm;
        self.text(x + dx, baseline, text)
    }

    /// Word-wrap `text` into lines of `line_h` inside width `w`, left aligned.
    /// Returns the height used.
    pub fn multi_cell(&mut self, x: f32, y: f32, w: f32, line_h: f32, text: &str) -> Result<f32, fmt::Error> {
        let lines = self.wrap(text, w - 2.0 * CELL_MARGIN);
        for (i, line) in lines.iter().enumerate() {
            self.cell(x, y + i as f32 * line_h, w, line_h, line, Align::Left)?;
        }
        Ok(lines.len() as f32 * line_h)
    }

    fn wrap(&self, text: &str, max_w: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && self.string_width(&candidate) > max_w {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Place an image with its top-left corner at `(x, y)`
    pub fn image(&mut self, id: ImageId, x: f32, y: f32, w: f32, h: f32) -> fmt::Result {
        writeln!(
            self.content,
            "q {} 0 0 {} {} {} cm /Im{} Do Q",
            num(mm_to_pt(w)),
            num(mm_to_pt(h)),
            num(mm_to_pt(x)),
            num(mm_to_pt(self.height - y - h)),
            id.0
        )?;
        if !self.images.contains(&id) {
            self.images.push(id);
        }
        Ok(())
    }

    /// Raw content stream operators
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A document under construction
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    title: Option<String>,
    pages: Vec<Page>,
    images: Vec<PdfImage>,
}

impl PdfDocument {
    /// Empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Document title for the info dictionary
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Register an image; pages refer to it through the returned id
    pub fn add_image(&mut self, image: PdfImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    /// Append a finished page
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Pages added so far
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Serialize the document
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = ObjectWriter::default();
        self.write_objects(&mut out)?;
        out.finish()
    }

    fn write_objects(&self, out: &mut ObjectWriter) -> io::Result<()> {
        // 1 catalog, 2 page tree, 3-4 fonts, 5 info, then images, then
        // (page, content) pairs
        const FIRST_IMAGE: usize = 6;
        let first_page = FIRST_IMAGE + self.images.len();
        let page_obj = |i: usize| first_page + 2 * i;

        out.begin(1)?;
        write!(out.buf, "<< /Type /Catalog /Pages 2 0 R >>")?;
        out.end()?;

        out.begin(2)?;
        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", page_obj(i)))
            .collect();
        write!(
            out.buf,
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            self.pages.len()
        )?;
        out.end()?;

        for (num, font) in [(3, Font::Regular), (4, Font::Bold)] {
            out.begin(num)?;
            write!(
                out.buf,
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )?;
            out.end()?;
        }

        out.begin(5)?;
        write!(
            out.buf,
            "<< /Producer ({}) ",
            escape_text(&format!("dalsplit {}", crate::VERSION))
        )?;
        if let Some(title) = &self.title {
            write!(out.buf, "/Title ({}) ", escape_text(title))?;
        }
        write!(out.buf, ">>")?;
        out.end()?;

        for (i, image) in self.images.iter().enumerate() {
            out.begin(FIRST_IMAGE + i)?;
            write_image(&mut out.buf, image)?;
            out.end()?;
        }

        for (i, page) in self.pages.iter().enumerate() {
            let xobjects: Vec<String> = page
                .images
                .iter()
                .map(|id| format!("/Im{} {} 0 R", id.0, FIRST_IMAGE + id.0))
                .collect();

            out.begin(page_obj(i))?;
            write!(
                out.buf,
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> /XObject << {} >> >> \
                 /Contents {} 0 R >>",
                num(mm_to_pt(page.width)),
                num(mm_to_pt(page.height)),
                xobjects.join(" "),
                page_obj(i) + 1
            )?;
            out.end()?;

            out.begin(page_obj(i) + 1)?;
            write!(out.buf, "<< /Length {} >>\nstream\n", page.content.len())?;
            out.buf.extend_from_slice(page.content.as_bytes());
            write!(out.buf, "\nendstream")?;
            out.end()?;
        }

        Ok(())
    }
}

fn write_image(buf: &mut Vec<u8>, image: &PdfImage) -> io::Result<()> {
    let color_space = match &image.color_space {
        ColorSpace::Gray => "/DeviceGray".to_string(),
        ColorSpace::Rgb => "/DeviceRGB".to_string(),
        ColorSpace::Cmyk => "/DeviceCMYK".to_string(),
        ColorSpace::Indexed { palette } => {
            let hex: String = palette.iter().map(|b| format!("{b:02X}")).collect();
            format!("[/Indexed /DeviceRGB {} <{}>]", palette.len() / 3 - 1, hex)
        }
    };

    write!(
        buf,
        "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} /BitsPerComponent {} ",
        image.width, image.height, color_space, image.bits_per_component
    )?;
    match image.filter {
        ImageFilter::Dct => write!(buf, "/Filter /DCTDecode ")?,
        ImageFilter::FlatePng => write!(
            buf,
            "/Filter /FlateDecode /DecodeParms << /Predictor 15 /Colors {} /BitsPerComponent {} /Columns {} >> ",
            image.color_space.components(),
            image.bits_per_component,
            image.width
        )?,
        ImageFilter::Flate => write!(buf, "/Filter /FlateDecode ")?,
    }
    if image.invert_cmyk {
        write!(buf, "/Decode [1 0 1 0 1 0 1 0] ")?;
    }
    write!(buf, "/Length {} >>\nstream\n", image.data.len())?;
    buf.extend_from_slice(&image.data);
    write!(buf, "\nendstream")
}

/// Tracks object offsets for the cross-reference table
struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl Default for ObjectWriter {
    fn default() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }
}

impl ObjectWriter {
    fn begin(&mut self, num: usize) -> io::Result<()> {
        // Objects are numbered 1.. in write order
        debug_assert_eq!(num, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        write!(self.buf, "{num} 0 obj\n")
    }

    fn end(&mut self) -> io::Result<()> {
        write!(self.buf, "\nendobj\n")
    }

    fn finish(mut self) -> io::Result<Vec<u8>> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;
        write!(self.buf, "xref\n0 {count}\n0000000000 65535 f \n")?;
        for offset in &self.offsets {
            write!(self.buf, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {count} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        )?;
        Ok(self.buf)
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros
fn num(value: f32) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape text for a PDF literal string. Latin-1 characters are written as
/// octal escapes (WinAnsi agrees with Latin-1 from 0xA0 up); anything else
/// prints as `?`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{A0}'..='\u{FF}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}
