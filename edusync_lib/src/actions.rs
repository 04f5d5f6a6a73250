//! Mutation action sets: create/update/delete with validated dispatch.
//!
//! Every action uniformly returns `Result<_, Error>`; the per-instance
//! `loading` flag and `last_error` mirror whichever action ran last, so
//! UI-style callers can poll them. One action set instance runs one action
//! at a time; callers needing concurrency instantiate separate sets.
//! On success, callers are responsible for refetching any watcher that
//! should reflect the change; nothing is invalidated implicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;

use edusync_api::types::{
    Attendance, AttendancePayload, AttendanceState, Author, AuthorPayload, Book, BookPayload,
    Borrowing, BorrowingPayload, Category, CategoryPayload, ExportReceipt, Session, SessionPayload,
};
use edusync_api::{Client, Error, ExportFormat, FilterSet};

use crate::validate;

#[derive(Default)]
struct ActionState {
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl ActionState {
    fn begin(&self) {
        self.loading.store(true, Ordering::SeqCst);
        *self.error.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn finish<T>(&self, result: &Result<T, Error>) {
        if let Err(e) = result {
            *self.error.lock().unwrap_or_else(|e| e.into_inner()) = Some(e.to_string());
        }
        self.loading.store(false, Ordering::SeqCst);
    }

    fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    fn last_error(&self) -> Option<String> {
        self.error.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn clear_error(&self) {
        *self.error.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

macro_rules! tracked {
    ($state:expr, $body:expr) => {{
        $state.begin();
        let result = $body;
        $state.finish(&result);
        result
    }};
}

/// Attendance mutations, including the bulk register flows.
pub struct AttendanceActions {
    client: Client,
    state: ActionState,
}

impl AttendanceActions {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: ActionState::default(),
        }
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.last_error()
    }

    pub fn clear_error(&self) {
        self.state.clear_error()
    }

    /// Validates the whole batch, then submits it. A single invalid element
    /// rejects the batch before anything is sent.
    pub async fn bulk_save(&self, items: &[AttendancePayload]) -> Result<Vec<Attendance>, Error> {
        tracked!(self.state, {
            match validate::attendance_batch(items) {
                Ok(()) => self.client.bulk_create_attendances(items).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn update(&self, id: i64, payload: &AttendancePayload) -> Result<Attendance, Error> {
        tracked!(self.state, {
            match validate::attendance(payload) {
                Ok(()) => self.client.update_attendance(id, payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn remove(&self, id: i64) -> Result<(), Error> {
        tracked!(self.state, self.client.delete_attendance(id).await)
    }

    /// Records one student's state for a session in a single call.
    pub async fn quick(
        &self,
        student_id: i64,
        session_id: i64,
        state: AttendanceState,
        date: NaiveDate,
        remarks: Option<String>,
    ) -> Result<Attendance, Error> {
        let payload = AttendancePayload {
            student_id,
            session_id,
            date,
            state,
            remarks,
        };
        tracked!(self.state, {
            match validate::attendance(&payload) {
                Ok(()) => self.client.create_attendance(&payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn mark_all_present(
        &self,
        session_id: i64,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, Error> {
        self.mark_all(session_id, student_ids, date, AttendanceState::Present)
            .await
    }

    pub async fn mark_all_absent(
        &self,
        session_id: i64,
        student_ids: &[i64],
        date: NaiveDate,
    ) -> Result<Vec<Attendance>, Error> {
        self.mark_all(session_id, student_ids, date, AttendanceState::Absent)
            .await
    }

    async fn mark_all(
        &self,
        session_id: i64,
        student_ids: &[i64],
        date: NaiveDate,
        state: AttendanceState,
    ) -> Result<Vec<Attendance>, Error> {
        let payloads: Vec<AttendancePayload> = student_ids
            .iter()
            .map(|&student_id| AttendancePayload {
                student_id,
                session_id,
                date,
                state,
                remarks: None,
            })
            .collect();
        self.bulk_save(&payloads).await
    }

    /// Server-side export under the list endpoint's filter contract.
    /// Fire-and-forget: success or failure is reported, persisting the file
    /// is the caller's concern.
    pub async fn export(
        &self,
        format: ExportFormat,
        filters: &FilterSet,
    ) -> Result<ExportReceipt, Error> {
        tracked!(self.state, self.client.export_attendances(format, filters).await)
    }
}

/// Session mutations.
pub struct SessionActions {
    client: Client,
    state: ActionState,
}

impl SessionActions {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: ActionState::default(),
        }
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.last_error()
    }

    pub fn clear_error(&self) {
        self.state.clear_error()
    }

    pub async fn create(&self, payload: &SessionPayload) -> Result<Session, Error> {
        tracked!(self.state, {
            match validate::session(payload) {
                Ok(()) => self.client.create_session(payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn update(&self, id: i64, payload: &SessionPayload) -> Result<Session, Error> {
        tracked!(self.state, {
            match validate::session(payload) {
                Ok(()) => self.client.update_session(id, payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn remove(&self, id: i64) -> Result<(), Error> {
        tracked!(self.state, self.client.delete_session(id).await)
    }
}

/// Library circulation mutations: catalogue upkeep and loans.
pub struct LibraryActions {
    client: Client,
    state: ActionState,
}

impl LibraryActions {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: ActionState::default(),
        }
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.last_error()
    }

    pub fn clear_error(&self) {
        self.state.clear_error()
    }

    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, Error> {
        tracked!(self.state, {
            match validate::book(payload) {
                Ok(()) => self.client.create_book(payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn update_book(&self, id: i64, payload: &BookPayload) -> Result<Book, Error> {
        tracked!(self.state, {
            match validate::book(payload) {
                Ok(()) => self.client.update_book(id, payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn remove_book(&self, id: i64) -> Result<(), Error> {
        tracked!(self.state, self.client.delete_book(id).await)
    }

    pub async fn create_author(&self, payload: &AuthorPayload) -> Result<Author, Error> {
        tracked!(self.state, {
            match validate::author(payload) {
                Ok(()) => self.client.create_author(payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, Error> {
        tracked!(self.state, {
            match validate::category(payload) {
                Ok(()) => self.client.create_category(payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn create_borrowing(&self, payload: &BorrowingPayload) -> Result<Borrowing, Error> {
        tracked!(self.state, {
            match validate::borrowing(payload) {
                Ok(()) => self.client.create_borrowing(payload).await,
                Err(e) => Err(e),
            }
        })
    }

    pub async fn return_borrowing(&self, id: i64) -> Result<Borrowing, Error> {
        tracked!(self.state, self.client.return_borrowing(id).await)
    }
}
