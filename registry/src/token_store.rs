//! Credential persistence seam.
//!
//! A store is a single mutable slot. It performs no validation; the auth
//! context decides what a stored credential means.

use std::sync::Mutex;

/// Durable key under which front-ends persist the credential.
pub const TOKEN_STORAGE_KEY: &str = "jwt-token";

/// Persists exactly one bearer credential. Absence means logged out.
pub trait TokenStore: Send + Sync {
    fn save(&self, credential: &str);
    fn read(&self) -> Option<String>;
    fn clear(&self);
}

/// Process-memory store used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: &str) -> Self {
        Self { slot: Mutex::new(Some(credential.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, credential: &str) {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(credential.to_owned());
    }

    fn read(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;
