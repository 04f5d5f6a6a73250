//! Query builders for attendance records and class sessions.

use chrono::NaiveDate;
use url::Url;

use crate::types::AttendanceState;

use super::common::{Query, QueryCommon};

/// Filters for `GET /api/attendances`.
#[derive(Clone, Debug, Default)]
pub struct AttendanceQuery {
    pub common: QueryCommon,
    pub session_id: Option<i64>,
    pub student_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub state: Option<AttendanceState>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl Query for AttendanceQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(session_id) = self.session_id {
            url.query_pairs_mut()
                .append_pair("session_id", &session_id.to_string());
        }
        if let Some(student_id) = self.student_id {
            url.query_pairs_mut()
                .append_pair("student_id", &student_id.to_string());
        }
        if let Some(batch_id) = self.batch_id {
            url.query_pairs_mut()
                .append_pair("batch_id", &batch_id.to_string());
        }
        if let Some(state) = self.state {
            url.query_pairs_mut()
                .append_pair("state", state.as_str());
        }
        if let Some(date_from) = self.date_from {
            url.query_pairs_mut()
                .append_pair("date_from", &date_from.format("%Y-%m-%d").to_string());
        }
        if let Some(date_to) = self.date_to {
            url.query_pairs_mut()
                .append_pair("date_to", &date_to.format("%Y-%m-%d").to_string());
        }
        if let Some(search) = &self.search {
            if !search.trim().is_empty() {
                url.query_pairs_mut().append_pair("search", search.as_str());
            }
        }
        url
    }
}

impl AttendanceQuery {
    pub fn with_session_id(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }
    pub fn with_student_id(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }
    pub fn with_batch_id(mut self, batch_id: i64) -> Self {
        self.batch_id = Some(batch_id);
        self
    }
    pub fn with_state(mut self, state: AttendanceState) -> Self {
        self.state = Some(state);
        self
    }
    pub fn with_date_from(mut self, date_from: NaiveDate) -> Self {
        self.date_from = Some(date_from);
        self
    }
    pub fn with_date_to(mut self, date_to: NaiveDate) -> Self {
        self.date_to = Some(date_to);
        self
    }
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }
}

/// Filters for `GET /api/sessions`.
#[derive(Clone, Debug, Default)]
pub struct SessionQuery {
    pub common: QueryCommon,
    pub subject_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub state: Option<String>,
    pub search: Option<String>,
}

impl Query for SessionQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(subject_id) = self.subject_id {
            url.query_pairs_mut()
                .append_pair("subject_id", &subject_id.to_string());
        }
        if let Some(batch_id) = self.batch_id {
            url.query_pairs_mut()
                .append_pair("batch_id", &batch_id.to_string());
        }
        if let Some(teacher_id) = self.teacher_id {
            url.query_pairs_mut()
                .append_pair("teacher_id", &teacher_id.to_string());
        }
        if let Some(date_from) = self.date_from {
            url.query_pairs_mut()
                .append_pair("date_from", &date_from.format("%Y-%m-%d").to_string());
        }
        if let Some(date_to) = self.date_to {
            url.query_pairs_mut()
                .append_pair("date_to", &date_to.format("%Y-%m-%d").to_string());
        }
        if let Some(state) = &self.state {
            if !state.trim().is_empty() {
                url.query_pairs_mut().append_pair("state", state.as_str());
            }
        }
        if let Some(search) = &self.search {
            if !search.trim().is_empty() {
                url.query_pairs_mut().append_pair("search", search.as_str());
            }
        }
        url
    }
}

impl SessionQuery {
    pub fn with_subject_id(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }
    pub fn with_batch_id(mut self, batch_id: i64) -> Self {
        self.batch_id = Some(batch_id);
        self
    }
    pub fn with_teacher_id(mut self, teacher_id: i64) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }
    pub fn with_date_from(mut self, date_from: NaiveDate) -> Self {
        self.date_from = Some(date_from);
        self
    }
    pub fn with_date_to(mut self, date_to: NaiveDate) -> Self {
        self.date_to = Some(date_to);
        self
    }
    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }
}
