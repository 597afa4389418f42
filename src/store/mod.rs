//! Claim Store Seam
//!
//! The claim transactor runs against this minimal transactional capability
//! set instead of a concrete product: per-record snapshot reads that carry
//! a version, and an all-or-nothing commit whose writes are guarded by the
//! versions observed at read time. A commit against a record that changed
//! since it was read fails with [`StoreError::WriteConflict`] and applies
//! nothing; the transactor retries the whole attempt.
//!
//! Two backends:
//! - [`MemoryStore`] - dashmap-based, for tests and dev bootstrap
//! - [`PgStore`] - PostgreSQL via sqlx, CAS updates in one SQL transaction

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::claim::types::{Offer, UserAccount};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store error types
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// A guarded record changed between read and commit. The staged write
    /// set was not applied.
    #[error("write conflict: a record changed since it was read")]
    WriteConflict,

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// A record snapshot plus the version observed at read time.
///
/// Versions exist only at the store layer; they never reach the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub record: T,
    pub version: i64,
}

/// Staged offer write: absolute new count, bound to the version read.
#[derive(Debug, Clone)]
pub struct OfferWrite {
    pub offer_id: String,
    pub expected_version: i64,
    /// Absolute value, computed from the snapshot this commit is bound to.
    /// Not a blind increment: the version guard makes the write conflict
    /// if `claimed_count` changed since the read.
    pub claimed_count: u32,
}

/// Staged balance write: in-place increment, bound to the version read.
#[derive(Debug, Clone)]
pub struct AccountWrite {
    pub uid: String,
    pub expected_version: i64,
    pub delta_cents: i64,
}

/// The full write set of one claim, applied together or not at all.
#[derive(Debug, Clone)]
pub struct ClaimCommit {
    pub offer: OfferWrite,
    /// Sender debit and claimer credit; a self-claim collapses to a single
    /// zero-delta write so the same record is never guarded twice.
    pub accounts: Vec<AccountWrite>,
}

/// Transactional record store for offers and user accounts.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Read an offer snapshot by id.
    async fn load_offer(&self, offer_id: &str) -> Result<Option<Versioned<Offer>>, StoreError>;

    /// Read a user account snapshot by uid.
    async fn load_account(&self, uid: &str) -> Result<Option<Versioned<UserAccount>>, StoreError>;

    /// Apply a staged claim atomically. Fails with
    /// [`StoreError::WriteConflict`] (and applies nothing) if any guarded
    /// record's version no longer matches.
    async fn commit(&self, commit: ClaimCommit) -> Result<(), StoreError>;

    /// Upsert an offer record. Used by external creation flows and the
    /// `mock-api` seeding endpoints, never by the claim transaction.
    async fn put_offer(&self, offer: Offer) -> Result<(), StoreError>;

    /// Upsert a user account record.
    async fn put_account(&self, account: UserAccount) -> Result<(), StoreError>;

    /// Backend liveness probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}
