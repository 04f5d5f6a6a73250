//! The `books` subcommand: lists the library catalogue.

use anyhow::Result;
use clap::Args;
use edusync_lib::{BookQuery, Client, Query};

use crate::output::{print_books_csv, print_books_table, print_json, OutputFormat};

use super::print_page_summary;

#[derive(Args)]
pub struct BooksArgs {
    /// Filter by author ID
    #[arg(long)]
    pub author_id: Option<i64>,

    /// Filter by category ID
    #[arg(long)]
    pub category_id: Option<i64>,

    /// Only books with at least one available copy
    #[arg(long)]
    pub available: bool,

    /// Search by title or ISBN
    #[arg(long)]
    pub search: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: i64,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: i64,
}

pub async fn run(args: &BooksArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let mut query = BookQuery::default()
        .with_page(args.page)
        .with_limit(args.limit);

    if let Some(author_id) = args.author_id {
        query = query.with_author_id(author_id);
    }
    if let Some(category_id) = args.category_id {
        query = query.with_category_id(category_id);
    }
    if args.available {
        query = query.available_only();
    }
    if let Some(ref search) = args.search {
        query = query.with_search(search);
    }

    let page = client.get_books(&query).await?;
    print_page_summary(&page.pagination, page.items.len());

    match format {
        OutputFormat::Table => print_books_table(&page.items),
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Csv => print_books_csv(&page.items)?,
    }

    Ok(())
}
