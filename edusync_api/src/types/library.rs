//! Library circulation: books, authors, categories, borrowings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub total_copies: i64,
    pub available_copies: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct BookPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub total_copies: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub book_count: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AuthorPayload {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub book_count: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryPayload {
    pub name: String,
}

/// One loan. The backend owns the loan state machine; this is a read model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Borrowing {
    pub id: i64,
    pub book_id: i64,
    #[serde(default)]
    pub book_title: Option<String>,
    pub student_id: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    pub borrow_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BorrowingPayload {
    pub book_id: i64,
    pub student_id: i64,
    pub borrow_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}
