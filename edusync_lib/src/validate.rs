//! Client-side payload validation, applied before any request is issued.
//!
//! The typed payloads already rule out malformed dates and unknown
//! attendance states; what remains is required-field and cross-field
//! checking. Batch validation is atomic: one bad element rejects the whole
//! batch, naming the 1-based item index.

use edusync_api::types::{
    AttendancePayload, AuthorPayload, BookPayload, BorrowingPayload, CategoryPayload,
    SessionPayload,
};
use edusync_api::Error;

fn fail(errors: Vec<String>) -> Result<(), Error> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors.join(", ")))
    }
}

/// Parses `HH:MM` into minutes since midnight.
fn parse_hhmm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

pub fn session(payload: &SessionPayload) -> Result<(), Error> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push("session name is required".to_string());
    }
    if payload.subject_id <= 0 {
        errors.push("subject_id is required".to_string());
    }
    if payload.batch_id <= 0 {
        errors.push("batch_id is required".to_string());
    }
    if payload.teacher_id <= 0 {
        errors.push("teacher_id is required".to_string());
    }
    match (
        parse_hhmm(&payload.start_time),
        parse_hhmm(&payload.end_time),
    ) {
        (Some(start), Some(end)) => {
            if start >= end {
                errors.push("end_time must be after start_time".to_string());
            }
        }
        (start, end) => {
            if start.is_none() {
                errors.push("start_time must be HH:MM".to_string());
            }
            if end.is_none() {
                errors.push("end_time must be HH:MM".to_string());
            }
        }
    }
    fail(errors)
}

pub fn attendance(payload: &AttendancePayload) -> Result<(), Error> {
    let mut errors = Vec::new();
    if payload.student_id <= 0 {
        errors.push("student_id is required".to_string());
    }
    if payload.session_id <= 0 {
        errors.push("session_id is required".to_string());
    }
    fail(errors)
}

/// Validates every element before anything is sent. Element *i* failing
/// rejects the whole batch.
pub fn attendance_batch(items: &[AttendancePayload]) -> Result<(), Error> {
    if items.is_empty() {
        return Err(Error::Validation("attendance batch is empty".to_string()));
    }
    for (i, item) in items.iter().enumerate() {
        if let Err(Error::Validation(msg)) = attendance(item) {
            return Err(Error::Validation(format!("item {}: {}", i + 1, msg)));
        }
    }
    Ok(())
}

pub fn book(payload: &BookPayload) -> Result<(), Error> {
    let mut errors = Vec::new();
    if payload.title.trim().is_empty() {
        errors.push("title is required".to_string());
    }
    if payload.total_copies <= 0 {
        errors.push("total_copies must be positive".to_string());
    }
    fail(errors)
}

pub fn author(payload: &AuthorPayload) -> Result<(), Error> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation("author name is required".to_string()));
    }
    Ok(())
}

pub fn category(payload: &CategoryPayload) -> Result<(), Error> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation("category name is required".to_string()));
    }
    Ok(())
}

pub fn borrowing(payload: &BorrowingPayload) -> Result<(), Error> {
    let mut errors = Vec::new();
    if payload.book_id <= 0 {
        errors.push("book_id is required".to_string());
    }
    if payload.student_id <= 0 {
        errors.push("student_id is required".to_string());
    }
    if let Some(due) = payload.due_date {
        if due < payload.borrow_date {
            errors.push("due_date cannot precede borrow_date".to_string());
        }
    }
    fail(errors)
}
