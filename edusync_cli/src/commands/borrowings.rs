//! The `borrowings` subcommand: lists library loans.

use anyhow::Result;
use clap::Args;
use edusync_lib::{BorrowingQuery, Client, Query};

use crate::output::{print_borrowings_csv, print_borrowings_table, print_json, OutputFormat};

use super::{parse_date, print_page_summary};

#[derive(Args)]
pub struct BorrowingsArgs {
    /// Filter by student ID
    #[arg(long)]
    pub student_id: Option<i64>,

    /// Filter by book ID
    #[arg(long)]
    pub book_id: Option<i64>,

    /// Filter by loan state (e.g. borrowed, returned)
    #[arg(long)]
    pub state: Option<String>,

    /// Only loans past their due date
    #[arg(long)]
    pub overdue: bool,

    /// Loans due before this date (YYYY-MM-DD)
    #[arg(long)]
    pub due_before: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: i64,
}

pub async fn run(args: &BorrowingsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = BorrowingQuery::default()
        .with_page(args.page)
        .with_limit(args.limit);

    if let Some(student_id) = args.student_id {
        query = query.with_student_id(student_id);
    }
    if let Some(book_id) = args.book_id {
        query = query.with_book_id(book_id);
    }
    if let Some(ref state) = args.state {
        query = query.with_state(state);
    }
    if args.overdue {
        query = query.overdue_only();
    }
    if let Some(ref due_before) = args.due_before {
        query = query.with_due_before(parse_date("--due-before", due_before)?);
    }

    let page = client.get_borrowings(&query).await?;
    print_page_summary(&page.pagination, page.items.len());

    match format {
        OutputFormat::Table => print_borrowings_table(&page.items),
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Csv => print_borrowings_csv(&page.items)?,
    }

    Ok(())
}
