//! The `stats` subcommand: aggregate attendance and library reports.

use anyhow::Result;
use clap::{Args, Subcommand};
use edusync_lib::{Client, FilterSet};
use serde_json::json;

use crate::output::{print_json, OutputFormat};

use super::parse_date;

#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub report: StatsReport,
}

#[derive(Subcommand)]
pub enum StatsReport {
    /// Attendance aggregate report
    Attendance {
        /// Restrict to one batch
        #[arg(long)]
        batch_id: Option<i64>,

        /// Records on/after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Records on/before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Library circulation report
    Library,
}

pub async fn run(args: &StatsArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    match &args.report {
        StatsReport::Attendance { batch_id, from, to } => {
            let mut filters = FilterSet::new();
            if let Some(batch_id) = batch_id {
                filters.set("batch_id", *batch_id);
            }
            if let Some(from) = from {
                filters.set("date_from", parse_date("--from", from)?);
            }
            if let Some(to) = to {
                filters.set("date_to", parse_date("--to", to)?);
            }

            let stats = client.get_attendance_statistics(&filters).await?;
            let g = &stats.global_statistics;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "total_sessions": g.total_sessions,
                    "total_attendances": g.total_attendances,
                    "present_count": g.present_count,
                    "absent_count": g.absent_count,
                    "late_count": g.late_count,
                    "excused_count": g.excused_count,
                    "attendance_rate": g.attendance_rate,
                    "by_date": stats.by_date,
                    "by_batch": stats.by_batch,
                })),
                _ => {
                    println!("Sessions:        {}", g.total_sessions);
                    println!("Records:         {}", g.total_attendances);
                    println!("Present:         {}", g.present_count);
                    println!("Absent:          {}", g.absent_count);
                    println!("Late:            {}", g.late_count);
                    println!("Excused:         {}", g.excused_count);
                    println!("Attendance rate: {:.1}%", g.attendance_rate);
                }
            }
        }
        StatsReport::Library => {
            let stats = client.get_library_statistics().await?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "total_books": stats.total_books,
                    "total_borrowings": stats.total_borrowings,
                    "active_borrowings": stats.active_borrowings,
                    "overdue_count": stats.overdue_count,
                })),
                _ => {
                    println!("Books:            {}", stats.total_books);
                    println!("Borrowings:       {}", stats.total_borrowings);
                    println!("Active loans:     {}", stats.active_borrowings);
                    println!("Overdue:          {}", stats.overdue_count);
                }
            }
        }
    }

    Ok(())
}
