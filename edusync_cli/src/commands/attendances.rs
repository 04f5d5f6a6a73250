//! The `attendances` subcommand: lists attendance records with filtering.

use anyhow::{bail, Result};
use clap::Args;
use edusync_lib::types::AttendanceState;
use edusync_lib::{AttendanceQuery, Client, Query};

use crate::output::{print_attendances_csv, print_attendances_table, print_json, OutputFormat};

use super::{parse_date, print_page_summary};

#[derive(Args)]
pub struct AttendancesArgs {
    /// Filter by session ID
    #[arg(long)]
    pub session_id: Option<i64>,

    /// Filter by student ID
    #[arg(long)]
    pub student_id: Option<i64>,

    /// Filter by batch ID
    #[arg(long)]
    pub batch_id: Option<i64>,

    /// Filter by state: present, absent, late, excused
    #[arg(long)]
    pub state: Option<String>,

    /// Records on/after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Records on/before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Search by student name
    #[arg(long)]
    pub search: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: i64,
}

pub async fn run(args: &AttendancesArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = AttendanceQuery::default()
        .with_page(args.page)
        .with_limit(args.limit);

    if let Some(session_id) = args.session_id {
        query = query.with_session_id(session_id);
    }
    if let Some(student_id) = args.student_id {
        query = query.with_student_id(student_id);
    }
    if let Some(batch_id) = args.batch_id {
        query = query.with_batch_id(batch_id);
    }
    if let Some(ref state) = args.state {
        match AttendanceState::parse(state) {
            Some(state) => query = query.with_state(state),
            None => bail!("--state must be one of: present, absent, late, excused"),
        }
    }
    if let Some(ref from) = args.from {
        query = query.with_date_from(parse_date("--from", from)?);
    }
    if let Some(ref to) = args.to {
        query = query.with_date_to(parse_date("--to", to)?);
    }
    if let Some(ref search) = args.search {
        query = query.with_search(search);
    }

    let page = client.get_attendances(&query).await?;
    print_page_summary(&page.pagination, page.items.len());

    match format {
        OutputFormat::Table => print_attendances_table(&page.items),
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Csv => print_attendances_csv(&page.items)?,
    }

    Ok(())
}
