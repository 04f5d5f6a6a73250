//! Response envelope and pagination metadata.

use serde::{Deserialize, Serialize};

/// Raw response envelope. Every backend response carries at least `status`;
/// list responses additionally carry `pagination` either here or nested
/// inside `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pagination metadata for a list response.
///
/// `has_next`/`has_prev` are recomputed from `page` and `total_pages` by
/// [`Pagination::normalized`]; the wire values are never trusted, and `page`
/// is clamped to `[1, max(total_pages, 1)]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

impl Pagination {
    pub fn normalized(mut self) -> Self {
        let max_page = self.total_pages.max(1);
        self.page = self.page.clamp(1, max_page);
        self.has_next = self.page < self.total_pages;
        self.has_prev = self.page > 1;
        self
    }
}

/// One page of a resource collection, replaced wholesale on every fetch.
#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Outcome of an export request. The file itself is carried in the envelope;
/// persisting it is the caller's concern.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportReceipt {
    pub filename: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// File payload, base64-encoded by the backend.
    pub content: String,
}

fn default_content_type() -> String {
    "text/csv".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_recomputes_navigation_flags() {
        let p = Pagination {
            page: 2,
            limit: 20,
            total_count: 45,
            total_pages: 3,
            // wire lies, on purpose
            has_next: false,
            has_prev: false,
        }
        .normalized();
        assert!(p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn page_is_clamped() {
        let p = Pagination {
            page: 9,
            total_pages: 3,
            ..Default::default()
        }
        .normalized();
        assert_eq!(p.page, 3);
        assert!(!p.has_next);

        let empty = Pagination::default().normalized();
        assert_eq!(empty.page, 1);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }
}
