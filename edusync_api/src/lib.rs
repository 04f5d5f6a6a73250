mod client;
mod credentials;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, ExportFormat};
pub use self::credentials::{CredentialStore, MemoryCredentials};
pub use self::errors::Error;
pub use self::query::{
    AttendanceQuery, BookQuery, BorrowingQuery, FilterSet, FilterValue, ListQuery, Query,
    SessionQuery,
};
