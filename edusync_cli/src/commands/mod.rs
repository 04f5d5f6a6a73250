pub mod attendances;
pub mod books;
pub mod borrowings;
pub mod export;
pub mod sessions;
pub mod stats;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use edusync_lib::types::Pagination;

/// Parses a `YYYY-MM-DD` CLI date argument.
pub fn parse_date(flag: &str, value: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(d) => Ok(d),
        Err(_) => bail!("{flag} must be a date in YYYY-MM-DD format, got '{value}'"),
    }
}

/// Page summary line, printed to stderr so it never pollutes csv/json output.
pub fn print_page_summary(pagination: &Pagination, shown: usize) {
    eprintln!(
        "Page {}/{} ({} shown, {} total)",
        pagination.page,
        pagination.total_pages.max(1),
        shown,
        pagination.total_count
    );
}
