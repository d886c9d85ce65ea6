//! Report file naming

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::input::ReportMeta;

fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"))
}

fn separator_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("valid regex"))
}

/// Reduce free text to a file-name fragment.
///
/// Accents are folded (NFKD, then non-ASCII dropped), punctuation other than
/// `-` and `_` is removed, the result is trimmed and lower-cased, and runs of
/// whitespace or `-` become a single `_`.
pub fn slugify(value: &str) -> String {
    let folded: String = value.nfkd().filter(char::is_ascii).collect();
    let stripped = strip_pattern().replace_all(&folded, "");
    let lowered = stripped.trim().to_lowercase();
    separator_pattern().replace_all(&lowered, "_").into_owned()
}

/// `{YYYY-MM-DD}_{vehicle}_{party}_{gaadi}_gaadi.pdf`
pub fn report_file_name(meta: &ReportMeta) -> String {
    format!(
        "{}_{}_{}_{}_gaadi.pdf",
        meta.file_date(),
        slugify(&meta.vehicle_number),
        slugify(&meta.party_name),
        slugify(meta.gaadi_type.as_str()),
    )
}
