mod attendance;
mod common;
mod library;

pub use attendance::{AttendanceQuery, SessionQuery};
pub use common::{FilterSet, FilterValue, ListQuery, Query, QueryCommon};
pub use library::{BookQuery, BorrowingQuery};
