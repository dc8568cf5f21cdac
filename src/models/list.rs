//! List query and list result models.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Read a field the backend may send as `null`, treating it like a missing
/// key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Value of a single field filter as entered in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    /// Free text; may hold several values separated by `|` or `,`.
    Text(String),
    /// Multi-select values.
    List(Vec<String>),
    /// Raw date input (`YYYY-MM-DD` or RFC 3339).
    Date(String),
    /// Numeric value.
    Number(i64),
}

/// UI filter state of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Status the view is restricted to (e.g. `REVISION`).
    pub status: Option<String>,

    /// Committed free-text search.
    pub search: String,

    /// Field filters keyed by backend field name.
    pub filters: BTreeMap<String, FilterValue>,

    /// 1-based page number.
    pub page: u32,

    /// Rows per page.
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Create a query restricted to a status.
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// Offset of the first row of the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Check the paging invariants before the query is sent.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page == 0 {
            return Err(AppError::invalid_input_field("page must be at least 1", "page"));
        }
        if self.page_size == 0 {
            return Err(AppError::invalid_input_field(
                "page size must be greater than 0",
                "pageSize",
            ));
        }
        Ok(())
    }
}

/// Total number of rows behind a list, as far as the backend tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TotalCount {
    /// Backend reported the total.
    Exact(u64),
    /// Backend omitted the total. `lower_bound` rows are known to exist and
    /// `has_more` is set when the page came back full.
    #[serde(rename_all = "camelCase")]
    Unknown { lower_bound: u64, has_more: bool },
}

impl Default for TotalCount {
    fn default() -> Self {
        Self::Exact(0)
    }
}

impl TotalCount {
    /// Row count to display: the exact total, or `lower_bound + 1` when more
    /// rows may exist.
    pub fn estimate(&self) -> u64 {
        match *self {
            Self::Exact(total) => total,
            Self::Unknown {
                lower_bound,
                has_more,
            } => lower_bound + u64::from(has_more),
        }
    }

    /// Check if the backend reported the total.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// One page of rows returned by the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: TotalCount,
    pub offset: u64,
}

impl<T> ListResult<T> {
    /// An empty first page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: TotalCount::Exact(0),
            offset: 0,
        }
    }

    /// Heuristic total: `offset + items + 1` when another page might exist.
    pub fn estimated_total(&self) -> u64 {
        self.total.estimate()
    }
}

/// A record that can be shown as a row of a list view.
pub trait ListRow {
    /// Backend identifier used in row action endpoints.
    fn row_id(&self) -> &str;

    /// Text the client-side table search matches against.
    fn search_text(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let query = ListQuery {
            page: 3,
            page_size: 20,
            ..Default::default()
        };
        assert_eq!(query.offset(), 40);
        assert_eq!(ListQuery::default().offset(), 0);
    }

    #[test]
    fn test_validate_rejects_zero_page() {
        let query = ListQuery {
            page: 0,
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(AppError::InvalidInput { field: Some(f), .. }) if f == "page"
        ));
    }

    #[test]
    fn test_unknown_total_estimate() {
        let total = TotalCount::Unknown {
            lower_bound: 10,
            has_more: true,
        };
        assert_eq!(total.estimate(), 11);
        assert!(!total.is_exact());
        assert_eq!(TotalCount::Exact(37).estimate(), 37);
    }

    #[test]
    fn test_filter_value_deserialize() {
        let json = r#"{"kind": "list", "value": ["TI", "SALUD"]}"#;
        let value: FilterValue = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            FilterValue::List(vec!["TI".to_string(), "SALUD".to_string()])
        );
    }
}
