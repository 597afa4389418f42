use std::sync::Arc;

use crate::auth::AuthVerifier;
use crate::claim::ClaimTransactor;
use crate::store::ClaimStore;

/// Shared gateway state, built once at bootstrap.
///
/// The store client is constructed a single time and injected everywhere;
/// there is no process-global storage handle.
pub struct AppState {
    /// Record store (also used directly by health and mock endpoints)
    pub store: Arc<dyn ClaimStore>,
    /// The claim core
    pub transactor: ClaimTransactor,
    /// Bearer-token verification
    pub auth: AuthVerifier,
}

impl AppState {
    pub fn new(store: Arc<dyn ClaimStore>, auth: AuthVerifier, max_commit_attempts: u32) -> Self {
        let transactor = ClaimTransactor::with_attempts(store.clone(), max_commit_attempts);
        Self {
            store,
            transactor,
            auth,
        }
    }
}
