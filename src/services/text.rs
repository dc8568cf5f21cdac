//! Display text helpers shared by models and views.

use chrono::{DateTime, Datelike, Local, NaiveDate};

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Lowercase `input` and strip diacritics so `Núñez` matches `nunez`.
pub fn normalize_text(input: &str) -> String {
    input.chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Parse a backend date (`YYYY-MM-DD` or RFC 3339) into a local calendar date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Short Mexican-Spanish date, e.g. `5 mar 2025`. Empty for unparseable input.
pub fn format_display_date(raw: &str) -> String {
    match parse_calendar_date(raw) {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_ES[date.month0() as usize],
            date.year()
        ),
        None => String::new(),
    }
}

/// Group digits by thousands: `18500` → `18,500`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
