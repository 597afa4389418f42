//! Claim Transactor
//!
//! Executes the atomic claim: read a consistent snapshot of the offer and
//! the two accounts, enforce the business preconditions, and stage three
//! writes that the store applies together or not at all.
//!
//! The attempt body has no side effects outside the commit, so it is safe
//! to re-run. A commit-time write conflict (some guarded record changed
//! since the read) retries the whole attempt against a fresh snapshot, up
//! to a bounded budget; exhaustion surfaces as [`ClaimError::Aborted`].

use std::sync::Arc;

use super::error::ClaimError;
use super::types::{ClaimCommand, ClaimReceipt};
use crate::store::{AccountWrite, ClaimCommit, ClaimStore, OfferWrite, StoreError};

/// Default commit-retry budget per invocation.
pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 5;

enum Attempt {
    Committed,
    Conflicted,
}

/// Runs validated claim commands against an injected store.
///
/// Constructed once at bootstrap and shared; holds no per-invocation
/// state.
#[derive(Clone)]
pub struct ClaimTransactor {
    store: Arc<dyn ClaimStore>,
    max_commit_attempts: u32,
}

impl ClaimTransactor {
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self::with_attempts(store, DEFAULT_MAX_COMMIT_ATTEMPTS)
    }

    pub fn with_attempts(store: Arc<dyn ClaimStore>, max_commit_attempts: u32) -> Self {
        Self {
            store,
            max_commit_attempts: max_commit_attempts.max(1),
        }
    }

    /// Execute one claim to completion.
    ///
    /// Business failures (missing records, exhausted spots, insufficient
    /// funds) are terminal for the invocation and abort with no writes.
    /// Only commit conflicts retry.
    pub async fn claim(&self, cmd: &ClaimCommand) -> Result<ClaimReceipt, ClaimError> {
        for attempt in 1..=self.max_commit_attempts {
            match self.try_claim(cmd).await? {
                Attempt::Committed => {
                    tracing::info!(
                        offer_id = %cmd.offer_id,
                        claimer_uid = %cmd.claimer_uid,
                        "claim committed"
                    );
                    return Ok(ClaimReceipt::ok());
                }
                Attempt::Conflicted => {
                    tracing::debug!(
                        offer_id = %cmd.offer_id,
                        attempt,
                        "claim commit conflicted, retrying with fresh snapshot"
                    );
                }
            }
        }

        tracing::warn!(
            offer_id = %cmd.offer_id,
            attempts = self.max_commit_attempts,
            "claim aborted: retry budget exhausted"
        );
        Err(ClaimError::Aborted)
    }

    /// One optimistic attempt: snapshot, check, stage, commit.
    async fn try_claim(&self, cmd: &ClaimCommand) -> Result<Attempt, ClaimError> {
        let offer = self
            .store
            .load_offer(&cmd.offer_id)
            .await?
            .ok_or(ClaimError::OfferNotFound)?;

        // Every field below comes from this attempt's snapshot.
        let amount = offer.record.amount_per_claim_cents;
        let creator_uid = &offer.record.creator_uid;

        if offer.record.is_exhausted() {
            return Err(ClaimError::SpotsExhausted);
        }

        let (sender, claimer) = tokio::try_join!(
            self.store.load_account(creator_uid),
            self.store.load_account(&cmd.claimer_uid),
        )?;
        let (Some(sender), Some(claimer)) = (sender, claimer) else {
            return Err(ClaimError::AccountMissing);
        };

        if sender.record.balance_cents < amount {
            return Err(ClaimError::InsufficientFunds);
        }

        let accounts = if *creator_uid == cmd.claimer_uid {
            // Creator claiming their own offer: the debit and credit land
            // on the same record and net to zero. One guarded write keeps
            // the record from being version-checked twice.
            vec![AccountWrite {
                uid: creator_uid.clone(),
                expected_version: sender.version,
                delta_cents: 0,
            }]
        } else {
            vec![
                AccountWrite {
                    uid: creator_uid.clone(),
                    expected_version: sender.version,
                    delta_cents: -amount,
                },
                AccountWrite {
                    uid: cmd.claimer_uid.clone(),
                    expected_version: claimer.version,
                    delta_cents: amount,
                },
            ]
        };

        let commit = ClaimCommit {
            offer: OfferWrite {
                offer_id: cmd.offer_id.clone(),
                expected_version: offer.version,
                claimed_count: offer.record.claimed_count + 1,
            },
            accounts,
        };

        match self.store.commit(commit).await {
            Ok(()) => Ok(Attempt::Committed),
            Err(StoreError::WriteConflict) => Ok(Attempt::Conflicted),
            Err(e) => Err(e.into()),
        }
    }
}
