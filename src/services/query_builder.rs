//! Query parameter builder.
//!
//! Turns the filter state of a list view into the query parameters the
//! backend expects. Pure: no I/O, no clock access beyond `build_query`
//! reading today's date.

use crate::models::{FilterValue, ListQuery};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Backend names of date filter keys that differ from the UI field name.
const DATE_KEY_ALIASES: &[(&str, &str)] = &[("createdAt", "dateFilter"), ("registeredAt", "date")];

/// Build query parameters for `query`, dropping dates after today.
pub fn build_query(query: &ListQuery) -> Vec<(String, String)> {
    build_query_at(query, Local::now().date_naive())
}

/// Build query parameters for `query` as of `today`.
///
/// # Arguments
/// * `query` - List filter state
/// * `today` - Local calendar date; date filters after it are omitted
///
/// # Returns
/// `limit` and `offset` first, then `status`, `search`, and the field filters
/// in key order. Array and composite filters produce one pair per value.
pub fn build_query_at(query: &ListQuery, today: NaiveDate) -> Vec<(String, String)> {
    let mut params = vec![
        ("limit".to_string(), query.page_size.to_string()),
        ("offset".to_string(), query.offset().to_string()),
    ];

    if let Some(status) = query.status.as_deref().map(str::trim) {
        if !status.is_empty() {
            params.push(("status".to_string(), status.to_string()));
        }
    }

    let search = query.search.trim();
    if !search.is_empty() {
        params.push(("search".to_string(), search.to_string()));
    }

    for (key, value) in &query.filters {
        match value {
            FilterValue::Text(text) => {
                for part in split_composite(text) {
                    params.push((key.clone(), part));
                }
            }
            FilterValue::List(values) => {
                for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
                    params.push((key.clone(), value.to_string()));
                }
            }
            FilterValue::Date(raw) => match normalize_date(raw) {
                Some(date) if date <= today => {
                    params.push((
                        date_param_name(key).to_string(),
                        date.format("%Y-%m-%d").to_string(),
                    ));
                }
                Some(date) => {
                    log::debug!("Dropping future date filter {}={}", key, date);
                }
                None => {}
            },
            FilterValue::Number(n) => params.push((key.clone(), n.to_string())),
        }
    }

    params
}

/// Split a `|` or `,` separated filter value into trimmed, non-empty parts.
fn split_composite(text: &str) -> Vec<String> {
    text.split(['|', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `YYYY-MM-DD` or RFC 3339 input; RFC 3339 is taken as its UTC date.
fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn date_param_name(key: &str) -> &str {
    DATE_KEY_ALIASES
        .iter()
        .find(|(ui, _)| *ui == key)
        .map(|(_, backend)| *backend)
        .unwrap_or(key)
}
