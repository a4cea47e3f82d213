//! A typed body for the search, delete-by-filter and count endpoints.

use serde::{Deserialize, Serialize};

/// A search query: filters, ordering, paging and projection.
///
/// Search endpoints accept any serializable body; this is the common shape.
///
/// # Examples
///
/// ```
/// use bsh_engine::{BshSearch, FilterOperator, SortDirection};
///
/// let search = BshSearch::new()
///     .filter("status", FilterOperator::Eq, "ACTIVE")
///     .filter("price", FilterOperator::Gte, 10)
///     .sort("createdAt", SortDirection::Desc)
///     .page(2, 50);
///
/// let body = serde_json::to_value(&search).unwrap();
/// assert_eq!(body["filters"][1]["operator"], "gte");
/// assert_eq!(body["pagination"]["size"], 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BshSearch {
    /// Conditions every returned row must satisfy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,

    /// Ordering, most significant first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sort>,

    /// Which page to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,

    /// Restricts the returned columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_fields: Vec<String>,
}

impl BshSearch {
    /// An empty search matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Adds a sort key.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Requests page `page` (zero based) of `size` rows.
    pub fn page(mut self, page: u32, size: u32) -> Self {
        self.pagination = Some(Pagination { page, size });
        self
    }

    /// Restricts the returned columns.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// One filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// The column to test.
    pub field: String,
    /// The comparison.
    pub operator: FilterOperator,
    /// The operand. Ignored by `isnull`/`isnotnull`.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Comparison operators understood by the search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// The column to order by.
    pub field: String,
    /// The order.
    pub direction: SortDirection,
}

/// Sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Offset paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based page index.
    pub page: u32,
    /// Rows per page.
    pub size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_search_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(BshSearch::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_select_uses_camel_case_key() {
        let body = serde_json::to_value(BshSearch::new().select(["id", "name"])).unwrap();
        assert_eq!(body, json!({"selectedFields": ["id", "name"]}));
    }

    #[test]
    fn test_multi_word_operators_are_lowercased() {
        let search = BshSearch::new().filter("deletedAt", FilterOperator::IsNull, json!(null));
        let body = serde_json::to_value(search).unwrap();
        assert_eq!(body["filters"][0]["operator"], "isnull");
    }
}
