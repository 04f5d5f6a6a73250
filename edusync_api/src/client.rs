//! HTTP client for the EduSync school-management REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{
    credentials::CredentialStore,
    errors::friendly_backend_message,
    query::{AttendanceQuery, BookQuery, BorrowingQuery, FilterSet, ListQuery, Query, SessionQuery},
    types::{
        flatten_report_payload, Attendance, AttendancePayload, AttendanceStatistics, Author,
        AuthorPayload, Book, BookPayload, Borrowing, BorrowingPayload, Category, CategoryPayload,
        Envelope, ExportReceipt, LibraryStatistics, Page, Pagination, Session, SessionPayload,
    },
    Error,
};

/// Header carrying the session token.
const SESSION_HEADER: &str = "X-Session-Id";

/// File format for list exports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// HTTP client for the EduSync backend.
///
/// The session credential is read from an injected [`CredentialStore`] on
/// every request and attached as the `X-Session-Id` header. Each request
/// builds a fresh `reqwest::Client` with a 30-second timeout.
///
/// Success is determined by the JSON envelope's `status` field alone; the
/// backend answers creation with either 200 or 201 and both are accepted.
/// A 401 clears the stored credential and maps to [`Error::AuthExpired`].
#[derive(Clone)]
pub struct Client {
    base_api_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl Client {
    /// Creates a new client for the given base URL and credential store.
    pub fn new(base_url: &str, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// The credential store this client reads from and clears on 401.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Whether a session token is currently stored.
    pub fn has_credentials(&self) -> bool {
        self.credentials.get().is_some()
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("invalid URL constructed: {}", e);
            Error::Shape(format!("invalid request URL: {e}"))
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn request<Q>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<Value>,
    ) -> Result<Envelope, Error>
    where
        Q: Query,
    {
        let url = self.get_url(path, query)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("failed to build HTTP client: {}", e);
                Error::Unreachable(e.to_string())
            })?;

        let mut req = client
            .request(method.clone(), url.clone())
            .header("content-type", "application/json")
            .header("accept", "application/json");
        if let Some(token) = self.credentials.get() {
            req = req.header(SESSION_HEADER, token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, url, e);
            Error::Unreachable(e.to_string())
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!("401 from {}, clearing stored credential", url.path());
            self.credentials.clear();
            return Err(Error::AuthExpired);
        }

        let text = resp.text().await.map_err(|e| {
            tracing::warn!("failed to read response body: {}", e);
            Error::Unreachable(e.to_string())
        })?;

        let value: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(_) if !status.is_success() => {
                return Err(Error::Backend(format!("HTTP {}", status.as_u16())));
            }
            Err(e) => {
                tracing::error!("non-JSON response from {}: {}", url.path(), e);
                return Err(Error::Shape("response body is not JSON".to_string()));
            }
        };

        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|_| Error::Shape("response envelope is missing a status field".to_string()))?;

        match envelope.status.as_str() {
            "success" => Ok(envelope),
            "error" => {
                let raw = envelope
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                Err(Error::Backend(friendly_backend_message(&raw)))
            }
            other => Err(Error::Shape(format!("unknown envelope status '{other}'"))),
        }
    }

    fn to_body(payload: &impl Serialize) -> Result<Value, Error> {
        serde_json::to_value(payload)
            .map_err(|e| Error::Validation(format!("payload is not serializable: {e}")))
    }

    /// Fetches a paginated collection. The collection is accepted either
    /// directly under `data` or nested one level under `data.<collection>`,
    /// with pagination metadata top-level or inside `data`.
    pub async fn list<T>(
        &self,
        path: &str,
        collection: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, Error>
    where
        T: DeserializeOwned,
    {
        let envelope = self.request(Method::GET, path, Some(query), None).await?;
        extract_page(envelope, collection)
    }

    /// Fetches a single record by envelope `data`.
    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let envelope = self
            .request::<ListQuery>(Method::GET, path, None, None)
            .await?;
        extract_one(envelope)
    }

    /// Fetches an aggregate report payload, normalizing the single-level
    /// `data.data` nesting some report endpoints produce.
    pub async fn fetch_report(&self, path: &str, filters: &FilterSet) -> Result<Value, Error> {
        let query = ReportQuery::new(filters.clone());
        let envelope = self.request(Method::GET, path, Some(&query), None).await?;
        let data = envelope
            .data
            .ok_or_else(|| Error::Shape("report response carries no data".to_string()))?;
        Ok(flatten_report_payload(data))
    }

    // -- Attendances --

    pub async fn get_attendances(&self, query: &AttendanceQuery) -> Result<Page<Attendance>, Error> {
        let envelope = self
            .request(Method::GET, "/api/attendances", Some(query), None)
            .await?;
        extract_page(envelope, "attendances")
    }

    pub async fn get_attendance(&self, id: i64) -> Result<Attendance, Error> {
        self.get_one(&format!("/api/attendances/{id}")).await
    }

    pub async fn create_attendance(&self, payload: &AttendancePayload) -> Result<Attendance, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/attendances",
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    /// Bulk create. The backend treats the batch atomically; so does the
    /// client-side validation layer above this call.
    pub async fn bulk_create_attendances(
        &self,
        payloads: &[AttendancePayload],
    ) -> Result<Vec<Attendance>, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/attendances/bulk",
                None,
                Some(Self::to_body(&payloads)?),
            )
            .await?;
        extract_collection(envelope, "attendances")
    }

    pub async fn update_attendance(
        &self,
        id: i64,
        payload: &AttendancePayload,
    ) -> Result<Attendance, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::PUT,
                &format!("/api/attendances/{id}"),
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn delete_attendance(&self, id: i64) -> Result<(), Error> {
        self.request::<ListQuery>(Method::DELETE, &format!("/api/attendances/{id}"), None, None)
            .await?;
        Ok(())
    }

    pub async fn get_attendance_statistics(
        &self,
        filters: &FilterSet,
    ) -> Result<AttendanceStatistics, Error> {
        let data = self
            .fetch_report("/api/attendances/statistics", filters)
            .await?;
        serde_json::from_value(data)
            .map_err(|e| Error::Shape(format!("attendance statistics: {e}")))
    }

    /// Requests a server-side export of the attendance list under the same
    /// filter contract as the list endpoint. Fire-and-forget: the receipt
    /// carries the file, persisting it is the caller's concern.
    pub async fn export_attendances(
        &self,
        format: ExportFormat,
        filters: &FilterSet,
    ) -> Result<ExportReceipt, Error> {
        let mut query = filters.clone();
        query.set("format", format.as_str());
        let query = ReportQuery::new(query);
        let envelope = self
            .request(Method::GET, "/api/attendances/export", Some(&query), None)
            .await?;
        extract_one(envelope)
    }

    // -- Sessions --

    pub async fn get_sessions(&self, query: &SessionQuery) -> Result<Page<Session>, Error> {
        let envelope = self
            .request(Method::GET, "/api/sessions", Some(query), None)
            .await?;
        extract_page(envelope, "sessions")
    }

    pub async fn get_session(&self, id: i64) -> Result<Session, Error> {
        self.get_one(&format!("/api/sessions/{id}")).await
    }

    pub async fn create_session(&self, payload: &SessionPayload) -> Result<Session, Error> {
        let envelope = self
            .request::<ListQuery>(Method::POST, "/api/sessions", None, Some(Self::to_body(payload)?))
            .await?;
        extract_one(envelope)
    }

    pub async fn update_session(&self, id: i64, payload: &SessionPayload) -> Result<Session, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::PUT,
                &format!("/api/sessions/{id}"),
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn delete_session(&self, id: i64) -> Result<(), Error> {
        self.request::<ListQuery>(Method::DELETE, &format!("/api/sessions/{id}"), None, None)
            .await?;
        Ok(())
    }

    // -- Library --

    pub async fn get_books(&self, query: &BookQuery) -> Result<Page<Book>, Error> {
        let envelope = self
            .request(Method::GET, "/api/library/books", Some(query), None)
            .await?;
        extract_page(envelope, "books")
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, Error> {
        self.get_one(&format!("/api/library/books/{id}")).await
    }

    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/library/books",
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn update_book(&self, id: i64, payload: &BookPayload) -> Result<Book, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::PUT,
                &format!("/api/library/books/{id}"),
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), Error> {
        self.request::<ListQuery>(Method::DELETE, &format!("/api/library/books/{id}"), None, None)
            .await?;
        Ok(())
    }

    pub async fn get_authors(&self, query: &ListQuery) -> Result<Page<Author>, Error> {
        self.list("/api/library/authors", "authors", query).await
    }

    pub async fn create_author(&self, payload: &AuthorPayload) -> Result<Author, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/library/authors",
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn get_categories(&self, query: &ListQuery) -> Result<Page<Category>, Error> {
        self.list("/api/library/categories", "categories", query).await
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/library/categories",
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn get_borrowings(&self, query: &BorrowingQuery) -> Result<Page<Borrowing>, Error> {
        let envelope = self
            .request(Method::GET, "/api/library/borrowings", Some(query), None)
            .await?;
        extract_page(envelope, "borrowings")
    }

    pub async fn create_borrowing(&self, payload: &BorrowingPayload) -> Result<Borrowing, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                "/api/library/borrowings",
                None,
                Some(Self::to_body(payload)?),
            )
            .await?;
        extract_one(envelope)
    }

    /// Marks a loan as returned. Loan state transitions live in the backend.
    pub async fn return_borrowing(&self, id: i64) -> Result<Borrowing, Error> {
        let envelope = self
            .request::<ListQuery>(
                Method::POST,
                &format!("/api/library/borrowings/{id}/return"),
                None,
                None,
            )
            .await?;
        extract_one(envelope)
    }

    pub async fn get_library_statistics(&self) -> Result<LibraryStatistics, Error> {
        let data = self
            .fetch_report("/api/library/statistics", &FilterSet::new())
            .await?;
        serde_json::from_value(data).map_err(|e| Error::Shape(format!("library statistics: {e}")))
    }
}

/// Bare filter set serialized as query pairs. Report and export endpoints
/// are not paginated, so the common fields are never serialized.
struct ReportQuery {
    filters: FilterSet,
    common: crate::query::QueryCommon,
}

impl ReportQuery {
    fn new(filters: FilterSet) -> Self {
        Self {
            filters,
            common: Default::default(),
        }
    }
}

impl Query for ReportQuery {
    fn get_common(&mut self) -> &mut crate::query::QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        self.filters.add_to_url(url)
    }
}

fn extract_page<T: DeserializeOwned>(envelope: Envelope, collection: &str) -> Result<Page<T>, Error> {
    let data = envelope
        .data
        .ok_or_else(|| Error::Shape("list response carries no data".to_string()))?;

    let (items_value, nested_pagination) = match data {
        Value::Array(_) => (data, None),
        Value::Object(mut obj) => {
            let items = obj.remove(collection).ok_or_else(|| {
                Error::Shape(format!("expected a '{collection}' collection in data"))
            })?;
            if !items.is_array() {
                return Err(Error::Shape(format!("'{collection}' is not an array")));
            }
            (items, obj.remove("pagination"))
        }
        _ => {
            return Err(Error::Shape(
                "list data is neither an array nor an object".to_string(),
            ))
        }
    };

    let items: Vec<T> = serde_json::from_value(items_value)
        .map_err(|e| Error::Shape(format!("cannot decode '{collection}': {e}")))?;

    let pagination = match (envelope.pagination, nested_pagination) {
        (Some(p), _) => p,
        (None, Some(v)) => serde_json::from_value(v)
            .map_err(|e| Error::Shape(format!("cannot decode pagination: {e}")))?,
        (None, None) => Pagination::default(),
    };

    Ok(Page {
        items,
        pagination: pagination.normalized(),
    })
}

fn extract_one<T: DeserializeOwned>(envelope: Envelope) -> Result<T, Error> {
    let data = envelope
        .data
        .ok_or_else(|| Error::Shape("response carries no data".to_string()))?;
    serde_json::from_value(data).map_err(|e| Error::Shape(format!("cannot decode record: {e}")))
}

fn extract_collection<T: DeserializeOwned>(
    envelope: Envelope,
    collection: &str,
) -> Result<Vec<T>, Error> {
    Ok(extract_page(envelope, collection)?.items)
}
