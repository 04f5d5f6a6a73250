//! Stateful layer over the EduSync API client: reactive resource watchers,
//! mutation action sets, payload validation, and derived statistics views.
//!
//! Each watcher instance owns its own state; there is no shared cache
//! between instances, and mutations never invalidate other watchers.
//! Callers refetch explicitly.

pub mod actions;
pub mod pager;
pub mod resource;
pub mod statistics;
pub mod validate;
pub mod watch;

pub use edusync_api;
pub use edusync_api::types;
pub use edusync_api::{
    AttendanceQuery, BookQuery, BorrowingQuery, Client, CredentialStore, Error, ExportFormat,
    FilterSet, FilterValue, ListQuery, MemoryCredentials, Query, SessionQuery,
};

pub use actions::{AttendanceActions, LibraryActions, SessionActions};
pub use pager::Pager;
pub use resource::{Attendances, Authors, Books, Borrowings, Categories, Resource, Sessions};
pub use statistics::{
    AttendanceStatisticsWatcher, LibraryStatisticsWatcher, StatisticsWatcher, StatsSnapshot,
};
pub use watch::{ResourceWatcher, Snapshot};
