//! In-Memory Claim Store
//!
//! Dashmap-backed store with the same optimistic-concurrency semantics as
//! the PostgreSQL backend. Used by tests and by dev bootstrap when no
//! `postgres_url` is configured. State is lost on restart.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ClaimCommit, ClaimStore, StoreError, Versioned};
use crate::claim::types::{Offer, UserAccount};

/// In-memory store with per-record versioning.
///
/// Reads are lock-free. Commits serialize on a single mutex: all version
/// guards are validated before any write is applied, so a failed commit
/// leaves every record untouched. A read interleaved with a commit can
/// observe records from different points in time, but any such torn
/// snapshot is stale on at least one guarded record and is rejected at
/// commit time.
#[derive(Default)]
pub struct MemoryStore {
    offers: DashMap<String, Versioned<Offer>>,
    accounts: DashMap<String, Versioned<UserAccount>>,
    commit_lock: Mutex<()>,
    // Operation counters, diagnostic only (exposed for tests).
    reads: AtomicU64,
    commits: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of record reads served.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of commits applied (successful only).
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn load_offer(&self, offer_id: &str) -> Result<Option<Versioned<Offer>>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.offers.get(offer_id).map(|e| e.value().clone()))
    }

    async fn load_account(&self, uid: &str) -> Result<Option<Versioned<UserAccount>>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.accounts.get(uid).map(|e| e.value().clone()))
    }

    async fn commit(&self, commit: ClaimCommit) -> Result<(), StoreError> {
        let _guard = self
            .commit_lock
            .lock()
            .expect("claim commit lock poisoned");

        // Validate every guard and precompute balances before touching
        // anything, so a conflict applies no partial write set.
        {
            let offer = self
                .offers
                .get(&commit.offer.offer_id)
                .ok_or(StoreError::WriteConflict)?;
            if offer.version != commit.offer.expected_version {
                return Err(StoreError::WriteConflict);
            }
        }

        let mut new_balances = Vec::with_capacity(commit.accounts.len());
        for write in &commit.accounts {
            let account = self
                .accounts
                .get(&write.uid)
                .ok_or(StoreError::WriteConflict)?;
            if account.version != write.expected_version {
                return Err(StoreError::WriteConflict);
            }
            let balance = account
                .record
                .balance_cents
                .checked_add(write.delta_cents)
                .ok_or_else(|| {
                    StoreError::Backend(format!("balance overflow for uid {}", write.uid))
                })?;
            new_balances.push(balance);
        }

        // All guards hold; apply the write set.
        if let Some(mut offer) = self.offers.get_mut(&commit.offer.offer_id) {
            offer.record.claimed_count = commit.offer.claimed_count;
            offer.version += 1;
        }
        for (write, balance) in commit.accounts.iter().zip(new_balances) {
            if let Some(mut account) = self.accounts.get_mut(&write.uid) {
                account.record.balance_cents = balance;
                account.version += 1;
            }
        }

        self.commits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn put_offer(&self, offer: Offer) -> Result<(), StoreError> {
        let _guard = self
            .commit_lock
            .lock()
            .expect("claim commit lock poisoned");
        let version = self
            .offers
            .get(&offer.offer_id)
            .map(|e| e.version + 1)
            .unwrap_or(1);
        self.offers
            .insert(offer.offer_id.clone(), Versioned { record: offer, version });
        Ok(())
    }

    async fn put_account(&self, account: UserAccount) -> Result<(), StoreError> {
        let _guard = self
            .commit_lock
            .lock()
            .expect("claim commit lock poisoned");
        let version = self
            .accounts
            .get(&account.uid)
            .map(|e| e.version + 1)
            .unwrap_or(1);
        self.accounts
            .insert(account.uid.clone(), Versioned { record: account, version });
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
