//! The `sessions` subcommand: lists class sessions.

use anyhow::Result;
use clap::Args;
use edusync_lib::{Client, Query, SessionQuery};

use crate::output::{print_json, print_sessions_csv, print_sessions_table, OutputFormat};

use super::{parse_date, print_page_summary};

#[derive(Args)]
pub struct SessionsArgs {
    /// Filter by subject ID
    #[arg(long)]
    pub subject_id: Option<i64>,

    /// Filter by batch ID
    #[arg(long)]
    pub batch_id: Option<i64>,

    /// Filter by teacher ID
    #[arg(long)]
    pub teacher_id: Option<i64>,

    /// Sessions on/after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Sessions on/before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Filter by state (e.g. scheduled, completed, cancelled)
    #[arg(long)]
    pub state: Option<String>,

    /// Search by session name
    #[arg(long)]
    pub search: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: i64,
}

pub async fn run(args: &SessionsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = SessionQuery::default()
        .with_page(args.page)
        .with_limit(args.limit);

    if let Some(subject_id) = args.subject_id {
        query = query.with_subject_id(subject_id);
    }
    if let Some(batch_id) = args.batch_id {
        query = query.with_batch_id(batch_id);
    }
    if let Some(teacher_id) = args.teacher_id {
        query = query.with_teacher_id(teacher_id);
    }
    if let Some(ref from) = args.from {
        query = query.with_date_from(parse_date("--from", from)?);
    }
    if let Some(ref to) = args.to {
        query = query.with_date_to(parse_date("--to", to)?);
    }
    if let Some(ref state) = args.state {
        query = query.with_state(state);
    }
    if let Some(ref search) = args.search {
        query = query.with_search(search);
    }

    let page = client.get_sessions(&query).await?;
    print_page_summary(&page.pagination, page.items.len());

    match format {
        OutputFormat::Table => print_sessions_table(&page.items),
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Csv => print_sessions_csv(&page.items)?,
    }

    Ok(())
}
