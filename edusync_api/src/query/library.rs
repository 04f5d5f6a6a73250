//! Query builders for the library circulation endpoints.

use chrono::NaiveDate;
use url::Url;

use super::common::{Query, QueryCommon};

/// Filters for `GET /api/library/books`.
#[derive(Clone, Debug, Default)]
pub struct BookQuery {
    pub common: QueryCommon,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub available_only: bool,
    pub search: Option<String>,
}

impl Query for BookQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(author_id) = self.author_id {
            url.query_pairs_mut()
                .append_pair("author_id", &author_id.to_string());
        }
        if let Some(category_id) = self.category_id {
            url.query_pairs_mut()
                .append_pair("category_id", &category_id.to_string());
        }
        if self.available_only {
            url.query_pairs_mut().append_pair("available", "true");
        }
        if let Some(search) = &self.search {
            if !search.trim().is_empty() {
                url.query_pairs_mut().append_pair("search", search.as_str());
            }
        }
        url
    }
}

impl BookQuery {
    pub fn with_author_id(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }
    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }
}

/// Filters for `GET /api/library/borrowings`.
#[derive(Clone, Debug, Default)]
pub struct BorrowingQuery {
    pub common: QueryCommon,
    pub student_id: Option<i64>,
    pub book_id: Option<i64>,
    pub state: Option<String>,
    pub overdue_only: bool,
    pub due_before: Option<NaiveDate>,
}

impl Query for BorrowingQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(student_id) = self.student_id {
            url.query_pairs_mut()
                .append_pair("student_id", &student_id.to_string());
        }
        if let Some(book_id) = self.book_id {
            url.query_pairs_mut()
                .append_pair("book_id", &book_id.to_string());
        }
        if let Some(state) = &self.state {
            if !state.trim().is_empty() {
                url.query_pairs_mut().append_pair("state", state.as_str());
            }
        }
        if self.overdue_only {
            url.query_pairs_mut().append_pair("overdue", "true");
        }
        if let Some(due_before) = self.due_before {
            url.query_pairs_mut()
                .append_pair("due_before", &due_before.format("%Y-%m-%d").to_string());
        }
        url
    }
}

impl BorrowingQuery {
    pub fn with_student_id(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }
    pub fn with_book_id(mut self, book_id: i64) -> Self {
        self.book_id = Some(book_id);
        self
    }
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }
    pub fn overdue_only(mut self) -> Self {
        self.overdue_only = true;
        self
    }
    pub fn with_due_before(mut self, due_before: NaiveDate) -> Self {
        self.due_before = Some(due_before);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_query() {
        let base = Url::parse("https://example.com/api/library/books").unwrap();
        let url = BookQuery::default()
            .with_category_id(4)
            .available_only()
            .with_search("tolkien")
            .with_limit(25)
            .add_to_url(&base);
        assert_eq!(
            url.query(),
            Some("page=1&limit=25&category_id=4&available=true&search=tolkien")
        );
    }

    #[test]
    fn borrowing_query_overdue() {
        let base = Url::parse("https://example.com/api/library/borrowings").unwrap();
        let url = BorrowingQuery::default()
            .with_student_id(12)
            .overdue_only()
            .add_to_url(&base);
        assert_eq!(url.query(), Some("page=1&student_id=12&overdue=true"));
    }
}
