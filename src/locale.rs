//! Fixed Nepali label and numeral tables.
//!
//! Every user-facing string of the dashboard lives here so the rest of the
//! crate never carries scattered literals.

use std::fmt::Display;

/// ASCII digits in order.
const ASCII_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Devanagari digits, index-aligned with `ASCII_DIGITS`.
const NEPALI_DIGITS: [char; 10] = ['०', '१', '२', '३', '४', '५', '६', '७', '८', '९'];

/// Known caste spelling variants and their canonical form.
pub const CASTE_SYNONYMS: [(&str, &str); 3] = [
    ("गुरुङ्ग", "गुरुङ"),
    ("गुरूङ्ग", "गुरुङ"),
    ("गुरूङ", "गुरुङ"),
];

/// Default spreadsheet column holding the age.
pub const AGE_COLUMN: &str = "उमेर";

/// Default spreadsheet column holding the gender.
pub const GENDER_COLUMN: &str = "लिङ्ग";

/// Default spreadsheet column holding the caste.
pub const CASTE_COLUMN: &str = "जाति";

/// Caste label for rows with an empty caste cell.
pub const UNKNOWN_CASTE: &str = "अज्ञात";

pub const AGE_CHART_TITLE: &str = "उमेर समूह वितरण";
pub const GENDER_CHART_TITLE: &str = "लिङ्ग वितरण";
pub const CASTE_AXIS_TITLE: &str = "जाति";
pub const GENDER_AXIS_TITLE: &str = "लिङ्ग";
pub const POPULATION_AXIS_TITLE: &str = "जनसंख्या";

/// Font stack able to render Devanagari on common platforms.
pub const FONT_FAMILY: &str = "Nirmala UI, Mangal, Arial";
pub const FONT_SIZE: u32 = 14;

pub const PAGE_TITLE: &str = "📊 Excel-Based Demographic Visualization";

/// Shown when the dashboard is opened without a spreadsheet.
pub const MISSING_INPUT_WARNING: &str =
    "📄 कृपया Excel फाइल अपलोड गर्नुहोस् जसमा 'उमेर', 'लिङ्ग', 'जाति' को स्तम्भहरू छन्।";

/// Shown in place of a chart whose aggregate has no rows.
pub const NO_DATA_NOTICE: &str = "डाटा उपलब्ध छैन";

/// Title of the stacked caste chart for the selected number of castes.
pub fn caste_chart_title(top_n: usize) -> String {
    format!("शीर्ष {} जातिहरुमा लिङ्ग अनुसार स्तरीकृत बार चार्ट", top_n)
}

/// Render a value with its ASCII digits replaced by Devanagari digits.
///
/// Characters other than `0-9` are left untouched, so signs, decimal points
/// and surrounding text survive.
pub fn to_nepali_numerals(value: impl Display) -> String {
    value
        .to_string()
        .chars()
        .map(|ch| match ASCII_DIGITS.iter().position(|&d| d == ch) {
            Some(idx) => NEPALI_DIGITS[idx],
            None => ch,
        })
        .collect()
}

/// Replace Devanagari digits with ASCII digits so the text can be parsed.
pub fn to_ascii_numerals(text: &str) -> String {
    text.chars()
        .map(|ch| match NEPALI_DIGITS.iter().position(|&d| d == ch) {
            Some(idx) => ASCII_DIGITS[idx],
            None => ch,
        })
        .collect()
}

/// Parse a number written with either ASCII or Devanagari digits.
pub fn parse_localized_number(text: &str) -> Option<f64> {
    to_ascii_numerals(text.trim()).parse::<f64>().ok()
}
