//! Attendance records and class sessions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Presence state of a student for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceState {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceState::Present => "present",
            AttendanceState::Absent => "absent",
            AttendanceState::Late => "late",
            AttendanceState::Excused => "excused",
        }
    }

    /// Parses the backend's lowercase representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceState::Present),
            "absent" => Some(AttendanceState::Absent),
            "late" => Some(AttendanceState::Late),
            "excused" => Some(AttendanceState::Excused),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttendanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attendance record, as returned by `GET /api/attendances`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    #[serde(default)]
    pub student_name: Option<String>,
    pub session_id: i64,
    #[serde(default)]
    pub session_name: Option<String>,
    pub date: NaiveDate,
    pub state: AttendanceState,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Outbound payload for creating or updating an attendance record.
#[derive(Clone, Debug, Serialize)]
pub struct AttendancePayload {
    pub student_id: i64,
    pub session_id: i64,
    pub date: NaiveDate,
    pub state: AttendanceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// A scheduled class session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub subject_id: i64,
    #[serde(default)]
    pub subject_name: Option<String>,
    pub batch_id: i64,
    #[serde(default)]
    pub batch_name: Option<String>,
    pub teacher_id: i64,
    #[serde(default)]
    pub teacher_name: Option<String>,
    pub date: NaiveDate,
    /// Wall-clock times as `HH:MM`, local to the school.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Outbound payload for creating or updating a session.
#[derive(Clone, Debug, Serialize)]
pub struct SessionPayload {
    pub name: String,
    pub subject_id: i64,
    pub batch_id: i64,
    pub teacher_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}
