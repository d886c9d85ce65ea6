//! Standard Type 1 fonts and their metrics
//!
//! Only the two faces the report uses are defined. Widths are the AFM
//! advance widths (1/1000 em) for printable ASCII, 0x20..=0x7E.

/// Font face used on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl Font {
    /// Resource name inside page dictionaries
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// PostScript base font name
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Font::Regular => &HELVETICA_WIDTHS,
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_width(&self, c: char) -> u16 {
        match c as u32 {
            code @ 0x20..=0x7E => self.widths()[(code - 0x20) as usize],
            // Latin-1 letters are close to the lower-case average
            _ => 556,
        }
    }

    /// Width of `text` in points at `size` points
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_tables_cover_printable_ascii() {
        assert_eq!(Font::Regular.char_width(' '), 278);
        assert_eq!(Font::Regular.char_width('A'), 667);
        assert_eq!(Font::Regular.char_width('~'), 584);
        assert_eq!(Font::Bold.char_width('b'), 611);
        assert_eq!(Font::Bold.char_width('z'), 500);
    }

    #[test]
    fn test_text_width() {
        // "00" at 10pt = 2 * 556 / 1000 * 10
        assert!((Font::Regular.text_width("00", 10.0) - 11.12).abs() < 1e-4);
        assert!(Font::Bold.text_width("DAAL", 10.0) > Font::Regular.text_width("DAAL", 10.0));
        assert_eq!(Font::Regular.text_width("", 12.0), 0.0);
    }
}
