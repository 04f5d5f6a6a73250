//! Resource descriptors for the watcher layer.

use serde::de::DeserializeOwned;

use edusync_api::types::{Attendance, Author, Book, Borrowing, Category, Session};

/// A listable backend resource: its endpoint, the collection key its list
/// responses may nest items under, and whether an authenticated actor is
/// required before any request is issued.
pub trait Resource: Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;

    const PATH: &'static str;
    const COLLECTION: &'static str;
    const REQUIRES_AUTH: bool = true;
}

pub enum Attendances {}

impl Resource for Attendances {
    type Item = Attendance;
    const PATH: &'static str = "/api/attendances";
    const COLLECTION: &'static str = "attendances";
}

pub enum Sessions {}

impl Resource for Sessions {
    type Item = Session;
    const PATH: &'static str = "/api/sessions";
    const COLLECTION: &'static str = "sessions";
}

pub enum Books {}

impl Resource for Books {
    type Item = Book;
    const PATH: &'static str = "/api/library/books";
    const COLLECTION: &'static str = "books";
}

pub enum Authors {}

impl Resource for Authors {
    type Item = Author;
    const PATH: &'static str = "/api/library/authors";
    const COLLECTION: &'static str = "authors";
}

pub enum Categories {}

impl Resource for Categories {
    type Item = Category;
    const PATH: &'static str = "/api/library/categories";
    const COLLECTION: &'static str = "categories";
}

pub enum Borrowings {}

impl Resource for Borrowings {
    type Item = Borrowing;
    const PATH: &'static str = "/api/library/borrowings";
    const COLLECTION: &'static str = "borrowings";
}
