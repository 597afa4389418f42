//! offerclaim - Atomic Offer Claim Service
//!
//! One remote-callable operation: an authenticated user claims a spot on a
//! pre-defined offer, moving a fixed amount (integer cents) from the
//! offer's creator to themselves. The claim is a single atomic
//! read-check-write transaction over three records and stays correct
//! under concurrent attempts.
//!
//! # Modules
//!
//! - [`claim`] - The core: validator, transactor, error taxonomy
//! - [`store`] - Transactional record store seam (in-memory + PostgreSQL)
//! - [`auth`] - Bearer-token identity verification
//! - [`gateway`] - HTTP boundary (axum)
//! - [`config`] - Per-environment YAML configuration
//! - [`logging`] - tracing initialization

pub mod auth;
pub mod claim;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod store;

// Convenient re-exports at crate root
pub use auth::{AuthVerifier, Identity};
pub use claim::{
    ClaimCommand, ClaimError, ClaimReceipt, ClaimTransactor, ErrorKind, Offer, UserAccount,
    validate_claim_request,
};
pub use gateway::state::AppState;
pub use store::{ClaimStore, MemoryStore, PgStore, StoreError, Versioned};
