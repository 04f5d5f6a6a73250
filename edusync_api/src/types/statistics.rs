//! Aggregate report payloads.
//!
//! The reporting endpoints do not nest consistently: some answer
//! `{status, data: {...}}`, others `{status, data: {data: {...}}}`.
//! [`flatten_report_payload`] normalizes both to the flat shape before typed
//! deserialization. This is a documented contract of the backend, not a
//! workaround.

use serde::Deserialize;
use serde_json::Value;

/// Unwraps a single-key `data` wrapper exactly once.
pub fn flatten_report_payload(value: Value) -> Value {
    if let Some(obj) = value.as_object() {
        if obj.len() == 1 {
            if let Some(inner) = obj.get("data") {
                return inner.clone();
            }
        }
    }
    value
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GlobalStatistics {
    #[serde(default)]
    pub total_sessions: i64,
    #[serde(default)]
    pub total_attendances: i64,
    #[serde(default)]
    pub present_count: i64,
    #[serde(default)]
    pub absent_count: i64,
    #[serde(default)]
    pub late_count: i64,
    #[serde(default)]
    pub excused_count: i64,
    /// Percentage in `[0, 100]`, computed by the backend.
    #[serde(default)]
    pub attendance_rate: f64,
}

/// Attendance report aggregate. Extra report sections (per-date, per-batch
/// breakdowns) vary by report type and are kept as raw JSON.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttendanceStatistics {
    #[serde(default)]
    pub global_statistics: GlobalStatistics,
    #[serde(default)]
    pub by_date: Option<Value>,
    #[serde(default)]
    pub by_batch: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LibraryStatistics {
    #[serde(default)]
    pub total_books: i64,
    #[serde(default)]
    pub total_borrowings: i64,
    #[serde(default)]
    pub active_borrowings: i64,
    #[serde(default)]
    pub overdue_count: i64,
}
