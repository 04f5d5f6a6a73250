use anyhow::Result;
use edusync_lib::types::{Attendance, Book, Borrowing, Session};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct AttendanceRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Student")]
    #[serde(rename = "Student")]
    student: String,
    #[tabled(rename = "Session")]
    #[serde(rename = "Session")]
    session: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "Remarks")]
    #[serde(rename = "Remarks")]
    remarks: String,
}

#[derive(Tabled, Serialize)]
struct SessionRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    time: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Subject")]
    #[serde(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Batch")]
    #[serde(rename = "Batch")]
    batch: String,
    #[tabled(rename = "Teacher")]
    #[serde(rename = "Teacher")]
    teacher: String,
}

#[derive(Tabled, Serialize)]
struct BookRow {
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    #[serde(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "ISBN")]
    #[serde(rename = "ISBN")]
    isbn: String,
    #[tabled(rename = "Available")]
    #[serde(rename = "Available")]
    available: String,
}

#[derive(Tabled, Serialize)]
struct BorrowingRow {
    #[tabled(rename = "Book")]
    #[serde(rename = "Book")]
    book: String,
    #[tabled(rename = "Student")]
    #[serde(rename = "Student")]
    student: String,
    #[tabled(rename = "Borrowed")]
    #[serde(rename = "Borrowed")]
    borrowed: String,
    #[tabled(rename = "Due")]
    #[serde(rename = "Due")]
    due: String,
    #[tabled(rename = "Returned")]
    #[serde(rename = "Returned")]
    returned: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
}

// -- Row builders --

fn build_attendance_rows(records: &[Attendance]) -> Vec<AttendanceRow> {
    records
        .iter()
        .map(|a| AttendanceRow {
            date: a.date.to_string(),
            student: a
                .student_name
                .clone()
                .unwrap_or_else(|| format!("#{}", a.student_id)),
            session: a
                .session_name
                .clone()
                .unwrap_or_else(|| format!("#{}", a.session_id)),
            state: a.state.to_string(),
            remarks: a.remarks.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_session_rows(sessions: &[Session]) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|s| SessionRow {
            date: s.date.to_string(),
            time: format!("{}-{}", s.start_time, s.end_time),
            name: s.name.clone(),
            subject: s
                .subject_name
                .clone()
                .unwrap_or_else(|| format!("#{}", s.subject_id)),
            batch: s
                .batch_name
                .clone()
                .unwrap_or_else(|| format!("#{}", s.batch_id)),
            teacher: s
                .teacher_name
                .clone()
                .unwrap_or_else(|| format!("#{}", s.teacher_id)),
        })
        .collect()
}

fn build_book_rows(books: &[Book]) -> Vec<BookRow> {
    books
        .iter()
        .map(|b| BookRow {
            title: b.title.clone(),
            author: b.author_name.clone().unwrap_or_default(),
            category: b.category_name.clone().unwrap_or_default(),
            isbn: b.isbn.clone().unwrap_or_default(),
            available: format!("{}/{}", b.available_copies, b.total_copies),
        })
        .collect()
}

fn build_borrowing_rows(borrowings: &[Borrowing]) -> Vec<BorrowingRow> {
    borrowings
        .iter()
        .map(|b| BorrowingRow {
            book: b
                .book_title
                .clone()
                .unwrap_or_else(|| format!("#{}", b.book_id)),
            student: b
                .student_name
                .clone()
                .unwrap_or_else(|| format!("#{}", b.student_id)),
            borrowed: b.borrow_date.to_string(),
            due: b.due_date.map(|d| d.to_string()).unwrap_or_default(),
            returned: b.return_date.map(|d| d.to_string()).unwrap_or_default(),
            state: b.state.clone().unwrap_or_default(),
        })
        .collect()
}

// -- Table output --

pub fn print_attendances_table(records: &[Attendance]) {
    println!("{}", Table::new(build_attendance_rows(records)));
}

pub fn print_sessions_table(sessions: &[Session]) {
    println!("{}", Table::new(build_session_rows(sessions)));
}

pub fn print_books_table(books: &[Book]) {
    println!("{}", Table::new(build_book_rows(books)));
}

pub fn print_borrowings_table(borrowings: &[Borrowing]) {
    println!("{}", Table::new(build_borrowing_rows(borrowings)));
}

// -- CSV output --

pub fn print_attendances_csv(records: &[Attendance]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_attendance_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_sessions_csv(sessions: &[Session]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_session_rows(sessions) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_books_csv(books: &[Book]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_book_rows(books) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_borrowings_csv(borrowings: &[Borrowing]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_borrowing_rows(borrowings) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
