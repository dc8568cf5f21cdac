//! Remote list fetcher.
//!
//! Issues the paginated GET for a list view and normalizes the response
//! shapes the backend uses into a [`ListResult`].

use crate::error::AppError;
use crate::models::{ListResult, TotalCount};
use crate::services::api_client::Transport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A single issued fetch.
///
/// Carries a generation number so the view can tell whether the response is
/// still the latest one when it comes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTicket {
    pub generation: u64,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub offset: u64,
    pub page_size: u32,
    /// Key of the item array inside `data` (e.g. `companies`).
    pub collection_key: String,
    /// Key every item is nested under (e.g. `User`), if any.
    pub item_wrapper: Option<String>,
}

/// Run the GET described by `ticket` and normalize the body.
pub async fn fetch_page<T: DeserializeOwned>(
    transport: &dyn Transport,
    ticket: &FetchTicket,
) -> Result<ListResult<T>, AppError> {
    log::debug!(
        "Fetching {} (generation {}, offset {})",
        ticket.endpoint,
        ticket.generation,
        ticket.offset
    );

    let body = transport.get(&ticket.endpoint, &ticket.params).await?;
    normalize(
        body,
        &ticket.collection_key,
        ticket.item_wrapper.as_deref(),
        ticket.offset,
        ticket.page_size,
        &ticket.endpoint,
    )
}

/// Normalize a list response body.
///
/// Accepted shapes:
/// - `{ "data": [ ... ] }`
/// - `{ "data": { "<collection_key>": [ ... ], "total": n } }`
/// - `[ ... ]`
///
/// When `item_wrapper` is set, each element is unwrapped from
/// `{ "<item_wrapper>": ... }`; a wrapper holding an array is flattened.
pub fn normalize<T: DeserializeOwned>(
    body: Value,
    collection_key: &str,
    item_wrapper: Option<&str>,
    offset: u64,
    page_size: u32,
    endpoint: &str,
) -> Result<ListResult<T>, AppError> {
    let (raw_items, reported_total) = match body {
        Value::Array(items) => (items, None),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => (items, None),
            Some(Value::Object(mut data)) => {
                let total = data.get("total").and_then(Value::as_u64);
                match data.remove(collection_key) {
                    Some(Value::Array(items)) => (items, total),
                    _ => {
                        return Err(AppError::shape_mismatch(
                            format!("data has no '{}' array", collection_key),
                            endpoint,
                        ))
                    }
                }
            }
            _ => {
                return Err(AppError::shape_mismatch(
                    "response has no data array or object",
                    endpoint,
                ))
            }
        },
        other => {
            return Err(AppError::shape_mismatch(
                format!("unexpected response body: {}", json_kind(&other)),
                endpoint,
            ))
        }
    };

    let raw_items = match item_wrapper {
        Some(wrapper) => unwrap_items(raw_items, wrapper, endpoint)?,
        None => raw_items,
    };

    let mut items = raw_items
        .into_iter()
        .map(serde_json::from_value::<T>)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| AppError::shape_mismatch(format!("invalid list item: {}", e), endpoint))?;

    let limit = page_size as usize;
    if limit > 0 && items.len() > limit {
        log::warn!(
            "{} returned {} items for a page of {}; truncating",
            endpoint,
            items.len(),
            limit
        );
        items.truncate(limit);
    }

    let total = match reported_total {
        Some(total) => TotalCount::Exact(total),
        None => TotalCount::Unknown {
            lower_bound: offset + items.len() as u64,
            has_more: limit > 0 && items.len() == limit,
        },
    };

    Ok(ListResult {
        items,
        total,
        offset,
    })
}

fn unwrap_items(items: Vec<Value>, wrapper: &str, endpoint: &str) -> Result<Vec<Value>, AppError> {
    let mut unwrapped = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(mut map) => match map.remove(wrapper) {
                Some(Value::Array(inner)) => unwrapped.extend(inner),
                Some(inner) => unwrapped.push(inner),
                None => {
                    return Err(AppError::shape_mismatch(
                        format!("list item is not wrapped in '{}'", wrapper),
                        endpoint,
                    ))
                }
            },
            other => {
                return Err(AppError::shape_mismatch(
                    format!("list item is {}, expected object", json_kind(&other)),
                    endpoint,
                ))
            }
        }
    }
    Ok(unwrapped)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
