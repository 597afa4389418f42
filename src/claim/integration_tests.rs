//! Integration Tests for the Claim Flow
//!
//! These tests verify the complete validate-then-transact path against the
//! in-memory store, including the concurrency guarantees.

use std::sync::Arc;

use serde_json::json;

use crate::claim::error::ClaimError;
use crate::claim::transactor::ClaimTransactor;
use crate::claim::types::{ClaimCommand, Offer, UserAccount};
use crate::claim::validator::validate_claim_request;
use crate::store::{ClaimStore, MemoryStore, StoreError};

/// Helper to build a transactor over a fresh seeded store
struct TestHarness {
    store: Arc<MemoryStore>,
    transactor: ClaimTransactor,
}

impl TestHarness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let transactor = ClaimTransactor::new(store.clone());
        Self { store, transactor }
    }

    async fn seed_offer(&self, id: &str, creator: &str, claimed: u32, max: u32, amount: i64) {
        self.store
            .put_offer(Offer {
                offer_id: id.to_string(),
                creator_uid: creator.to_string(),
                claimed_count: claimed,
                max_claims: max,
                amount_per_claim_cents: amount,
            })
            .await
            .unwrap();
    }

    async fn seed_account(&self, uid: &str, balance: i64) {
        self.store
            .put_account(UserAccount {
                uid: uid.to_string(),
                balance_cents: balance,
            })
            .await
            .unwrap();
    }

    async fn balance(&self, uid: &str) -> i64 {
        self.store
            .load_account(uid)
            .await
            .unwrap()
            .unwrap()
            .record
            .balance_cents
    }

    async fn claimed_count(&self, offer_id: &str) -> u32 {
        self.store
            .load_offer(offer_id)
            .await
            .unwrap()
            .unwrap()
            .record
            .claimed_count
    }
}

fn cmd(claimer: &str, offer: &str) -> ClaimCommand {
    ClaimCommand {
        claimer_uid: claimer.to_string(),
        offer_id: offer.to_string(),
    }
}

// ========================================================================
// Happy Path
// ========================================================================

/// The worked example: Offer o1 pays 200 cents per claim out of u1's
/// 1000-cent balance; u2 claims once.
#[tokio::test]
async fn test_claim_happy_path() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    h.seed_account("u1", 1000).await;
    h.seed_account("u2", 0).await;

    let receipt = h.transactor.claim(&cmd("u2", "o1")).await.unwrap();
    assert!(receipt.success);

    assert_eq!(h.claimed_count("o1").await, 1);
    assert_eq!(h.balance("u1").await, 800);
    assert_eq!(h.balance("u2").await, 200);
}

#[tokio::test]
async fn test_claim_preserves_total_balance() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 350).await;
    h.seed_account("u1", 700).await;
    h.seed_account("u2", 125).await;
    let before = h.balance("u1").await + h.balance("u2").await;

    h.transactor.claim(&cmd("u2", "o1")).await.unwrap();

    let after = h.balance("u1").await + h.balance("u2").await;
    assert_eq!(before, after);
}

// ========================================================================
// Validation (no storage access)
// ========================================================================

#[tokio::test]
async fn test_unauthenticated_request_touches_no_records() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    let seeded_reads = h.store.read_count();

    let err = validate_claim_request(None, &json!({"offerId": "o1"})).unwrap_err();
    assert!(matches!(err, ClaimError::Unauthenticated));

    assert_eq!(h.store.read_count(), seeded_reads);
    assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn test_invalid_offer_id_touches_no_records() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    let seeded_reads = h.store.read_count();

    for payload in [json!({}), json!({"offerId": 7}), json!({"offerId": "  "})] {
        let err = validate_claim_request(Some("u2"), &payload).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidArgument));
    }

    assert_eq!(h.store.read_count(), seeded_reads);
    assert_eq!(h.store.commit_count(), 0);
}

// ========================================================================
// Precondition Failures (abort, no writes)
// ========================================================================

#[tokio::test]
async fn test_offer_not_found() {
    let h = TestHarness::new();
    h.seed_account("u2", 0).await;

    let err = h.transactor.claim(&cmd("u2", "missing")).await.unwrap_err();
    assert!(matches!(err, ClaimError::OfferNotFound));
    assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn test_exhausted_offer_rejects_without_writes() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 3, 3, 200).await;
    h.seed_account("u1", 1000).await;
    h.seed_account("u2", 0).await;

    let err = h.transactor.claim(&cmd("u2", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::SpotsExhausted));

    assert_eq!(h.claimed_count("o1").await, 3);
    assert_eq!(h.balance("u1").await, 1000);
    assert_eq!(h.balance("u2").await, 0);
    assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn test_insufficient_funds_rejects_without_writes() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    h.seed_account("u1", 199).await;
    h.seed_account("u2", 0).await;

    let err = h.transactor.claim(&cmd("u2", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::InsufficientFunds));

    assert_eq!(h.claimed_count("o1").await, 0);
    assert_eq!(h.balance("u1").await, 199);
    assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn test_missing_sender_account() {
    let h = TestHarness::new();
    h.seed_offer("o1", "ghost", 0, 5, 200).await;
    h.seed_account("u2", 0).await;

    let err = h.transactor.claim(&cmd("u2", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::AccountMissing));
    assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn test_missing_claimer_account() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    h.seed_account("u1", 1000).await;

    let err = h.transactor.claim(&cmd("nobody", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::AccountMissing));
    assert_eq!(h.store.commit_count(), 0);
}

// ========================================================================
// Concurrency
// ========================================================================

/// Two users race for the last remaining spot: exactly one wins, the
/// loser gets a precondition failure, and the sender is debited once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_on_last_spot() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 1, 200).await;
    h.seed_account("u1", 1000).await;
    h.seed_account("u2", 0).await;
    h.seed_account("u3", 0).await;

    let t2 = h.transactor.clone();
    let t3 = h.transactor.clone();
    let (r2, r3) = tokio::join!(
        tokio::spawn(async move { t2.claim(&cmd("u2", "o1")).await }),
        tokio::spawn(async move { t3.claim(&cmd("u3", "o1")).await }),
    );
    let results = [r2.unwrap(), r3.unwrap()];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let precondition_failures = results
        .iter()
        .filter(|r| matches!(r, Err(ClaimError::SpotsExhausted)))
        .count();
    assert_eq!(successes, 1, "exactly one claim must win the last spot");
    assert_eq!(precondition_failures, 1);

    assert_eq!(h.claimed_count("o1").await, 1);
    assert_eq!(h.balance("u1").await, 800);
    assert_eq!(
        h.balance("u2").await + h.balance("u3").await,
        200,
        "the payout must have landed exactly once"
    );
}

/// Many concurrent claimers against a small offer: grants never exceed
/// max_claims and the sender pays exactly for the grants.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_never_overgrant() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 3, 100).await;
    h.seed_account("u1", 10_000).await;
    for i in 0..8 {
        h.seed_account(&format!("c{i}"), 0).await;
    }

    let mut handles = Vec::new();
    for i in 0..8 {
        let t = h.transactor.clone();
        let claimer = format!("c{i}");
        handles.push(tokio::spawn(async move { t.claim(&cmd(&claimer, "o1")).await }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 3);
    assert_eq!(h.claimed_count("o1").await, 3);
    assert_eq!(h.balance("u1").await, 10_000 - 3 * 100);
}

// ========================================================================
// Documented Behaviors
// ========================================================================

/// No per-user dedup exists: the same claimer can take multiple spots on
/// one offer. This asserts the actual behavior, intentional or not.
#[tokio::test]
async fn test_same_user_may_claim_twice() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 2, 200).await;
    h.seed_account("u1", 1000).await;
    h.seed_account("u2", 0).await;

    h.transactor.claim(&cmd("u2", "o1")).await.unwrap();
    h.transactor.claim(&cmd("u2", "o1")).await.unwrap();

    assert_eq!(h.claimed_count("o1").await, 2);
    assert_eq!(h.balance("u1").await, 600);
    assert_eq!(h.balance("u2").await, 400);

    // The cap still binds afterwards.
    let err = h.transactor.claim(&cmd("u2", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::SpotsExhausted));
}

/// A creator claiming their own offer consumes a spot but nets zero on
/// their balance (paired debit and credit on one record).
#[tokio::test]
async fn test_creator_self_claim_nets_zero() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    h.seed_account("u1", 1000).await;

    let receipt = h.transactor.claim(&cmd("u1", "o1")).await.unwrap();
    assert!(receipt.success);

    assert_eq!(h.claimed_count("o1").await, 1);
    assert_eq!(h.balance("u1").await, 1000);
}

/// The funds check still applies to a self-claim.
#[tokio::test]
async fn test_creator_self_claim_still_requires_funds() {
    let h = TestHarness::new();
    h.seed_offer("o1", "u1", 0, 5, 200).await;
    h.seed_account("u1", 50).await;

    let err = h.transactor.claim(&cmd("u1", "o1")).await.unwrap_err();
    assert!(matches!(err, ClaimError::InsufficientFunds));
}

// ========================================================================
// Retry Budget
// ========================================================================

/// Store wrapper whose commits always conflict, to exhaust the retry
/// budget deterministically.
struct AlwaysConflicting {
    inner: MemoryStore,
    commit_attempts: std::sync::atomic::AtomicU32,
}

#[async_trait::async_trait]
impl ClaimStore for AlwaysConflicting {
    async fn load_offer(
        &self,
        offer_id: &str,
    ) -> Result<Option<crate::store::Versioned<Offer>>, StoreError> {
        self.inner.load_offer(offer_id).await
    }

    async fn load_account(
        &self,
        uid: &str,
    ) -> Result<Option<crate::store::Versioned<UserAccount>>, StoreError> {
        self.inner.load_account(uid).await
    }

    async fn commit(&self, _commit: crate::store::ClaimCommit) -> Result<(), StoreError> {
        self.commit_attempts
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Err(StoreError::WriteConflict)
    }

    async fn put_offer(&self, offer: Offer) -> Result<(), StoreError> {
        self.inner.put_offer(offer).await
    }

    async fn put_account(&self, account: UserAccount) -> Result<(), StoreError> {
        self.inner.put_account(account).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.inner.health_check().await
    }
}

#[tokio::test]
async fn test_retry_budget_exhaustion_surfaces_aborted() {
    let store = Arc::new(AlwaysConflicting {
        inner: MemoryStore::new(),
        commit_attempts: std::sync::atomic::AtomicU32::new(0),
    });
    store
        .put_offer(Offer {
            offer_id: "o1".to_string(),
            creator_uid: "u1".to_string(),
            claimed_count: 0,
            max_claims: 5,
            amount_per_claim_cents: 200,
        })
        .await
        .unwrap();
    store
        .put_account(UserAccount {
            uid: "u1".to_string(),
            balance_cents: 1000,
        })
        .await
        .unwrap();
    store
        .put_account(UserAccount {
            uid: "u2".to_string(),
            balance_cents: 0,
        })
        .await
        .unwrap();

    let transactor = ClaimTransactor::with_attempts(store.clone(), 3);
    let err = transactor.claim(&cmd("u2", "o1")).await.unwrap_err();

    assert!(matches!(err, ClaimError::Aborted));
    assert_eq!(
        store
            .commit_attempts
            .load(std::sync::atomic::Ordering::Relaxed),
        3,
        "every budgeted attempt should re-read and re-commit"
    );
}
