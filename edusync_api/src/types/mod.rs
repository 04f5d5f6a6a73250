mod attendance;
mod envelope;
mod library;
mod statistics;

pub use attendance::{
    Attendance, AttendancePayload, AttendanceState, Session, SessionPayload,
};
pub use envelope::{Envelope, ExportReceipt, Page, Pagination};
pub use library::{
    Author, AuthorPayload, Book, BookPayload, Borrowing, BorrowingPayload, Category,
    CategoryPayload,
};
pub use statistics::{flatten_report_payload, AttendanceStatistics, GlobalStatistics, LibraryStatistics};
