//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields,
//! and the dynamic [`FilterSet`] used by the watcher layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use url::Url;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for pagination.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the
    /// modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the page number (1-indexed).
    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().page = page.max(1);
        self
    }

    /// Sets the number of results per page.
    fn with_limit(mut self, limit: i64) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit.max(1));
        self
    }
}

/// Fields shared by all query types: pagination.
#[derive(Clone, Copy, Debug)]
pub struct QueryCommon {
    /// Page number (1-indexed). Defaults to 1.
    pub page: i64,
    /// Results per page. `None` uses the API default.
    pub limit: Option<i64>,
}

impl Default for QueryCommon {
    fn default() -> QueryCommon {
        QueryCommon {
            page: 1,
            limit: None,
        }
    }
}

impl QueryCommon {
    /// Appends the common pagination parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string());
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        url
    }
}

/// A single scalar filter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Flag(bool),
}

impl FilterValue {
    fn render(&self) -> String {
        match self {
            FilterValue::Int(v) => v.to_string(),
            FilterValue::Text(v) => v.clone(),
            FilterValue::Date(v) => v.format("%Y-%m-%d").to_string(),
            FilterValue::Flag(v) => v.to_string(),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, FilterValue::Text(t) if t.trim().is_empty())
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(v: NaiveDate) -> Self {
        FilterValue::Date(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Flag(v)
    }
}

/// An ordered key-to-scalar filter mapping.
///
/// An empty text value is a clear marker: it never reaches the query
/// string, and merging it removes the key from the target set. Iteration
/// order is the key order, which keeps serialized URLs deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a filter. An empty text value is kept as a clear marker so
    /// that merging this set into another removes the key there.
    pub fn set(&mut self, key: &str, value: impl Into<FilterValue>) -> &mut Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Builder-style [`FilterSet::set`].
    pub fn with(mut self, key: &str, value: impl Into<FilterValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Shallow merge: keys in `partial` overwrite, other keys are retained,
    /// and an empty text value in `partial` removes the key.
    pub fn merge(&mut self, partial: &FilterSet) {
        for (key, value) in &partial.entries {
            if value.is_empty() {
                self.entries.remove(key);
            } else {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    /// Rendered key/value pairs, for query-string construction. Clear
    /// markers are skipped.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.render()))
    }

    /// Appends every filter as a query pair.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.pairs() {
            url.query_pairs_mut().append_pair(key, &value);
        }
        url
    }
}

/// Pagination plus a dynamic filter set; the list query issued by the
/// watcher layer.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub common: QueryCommon,
    pub filters: FilterSet,
}

impl ListQuery {
    pub fn new(filters: FilterSet, page: i64, limit: i64) -> Self {
        Self {
            common: QueryCommon {
                page: page.max(1),
                limit: Some(limit.max(1)),
            },
            filters,
        }
    }
}

impl Query for ListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let url = self.common.add_to_url(url);
        self.filters.add_to_url(&url)
    }
}
