//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Storage;
use crate::services::identity::IdentityVerifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. All mutable state lives behind the storage
/// backend; nothing is shared in-process between requests. Configuration is
/// consumed at startup when the backends are chosen, so the state carries
/// only the two injected seams.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    storage: Arc<dyn Storage>,
    verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { storage, verifier }),
        }
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the identity verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn IdentityVerifier {
        self.inner.verifier.as_ref()
    }
}
