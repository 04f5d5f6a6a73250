//! Error types for the API client.

/// Errors produced when talking to the EduSync backend.
///
/// One sum type covers every failure family: validation
/// (caught before any network call), backend (`status: "error"` envelopes),
/// transport (auth expiry and unreachable hosts), and envelope shape.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A payload failed client-side validation; no request was sent.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The backend answered with a `status: "error"` envelope.
    #[error("{0}")]
    Backend(String),
    /// The backend answered 401. The stored credential has been cleared.
    #[error("session expired, please sign in again")]
    AuthExpired,
    /// The server could not be reached (DNS, refused connection, timeout).
    #[error("cannot reach the server: {0}")]
    Unreachable(String),
    /// Well-formed JSON that does not match the expected envelope contract.
    #[error("unexpected data format: {0}")]
    Shape(String),
}

impl Error {
    /// Whether the caller may reasonably retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unreachable(_))
    }

    /// True for the auth-failure case, so callers can redirect to login
    /// instead of showing a transient error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::AuthExpired)
    }
}

/// Rewrites known backend error patterns into friendlier text. The raw
/// message is kept verbatim when no pattern matches.
pub(crate) fn friendly_backend_message(raw: &str) -> String {
    if raw.contains("duplicate key") || raw.contains("already exists") {
        return "a record with these values already exists".to_string();
    }
    if raw.contains("violates foreign key") {
        return "a referenced record does not exist".to_string();
    }
    raw.to_string()
}
