//! Session credential storage, injected into the client.
//!
//! The storage is a trait object handed to [`crate::Client`] at
//! construction, so tests and embedders supply their own backing instead
//! of reading ambient global state.

use std::sync::Mutex;

/// Source of the session token attached to every request.
///
/// `clear` is invoked by the client when the backend answers 401.
pub trait CredentialStore: Send + Sync {
    /// Returns the current session token, if any.
    fn get(&self) -> Option<String>;
    /// Stores a new session token.
    fn set(&self, token: &str);
    /// Discards the stored token.
    fn clear(&self);
}

/// In-memory credential store. The default for CLI use and tests.
#[derive(Default)]
pub struct MemoryCredentials {
    token: Mutex<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a token.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
