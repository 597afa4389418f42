//! Offer Claim Core
//!
//! One remote-callable operation: an authenticated user claims a spot on
//! an offer, moving `amount_per_claim_cents` from the offer's creator to
//! the claimer.
//!
//! # Flow
//!
//! ```text
//! caller → validator (auth + payload shape) → transactor → store commit
//! ```
//!
//! # Safety Invariants
//!
//! 1. **All-or-Nothing**: the three writes (count, debit, credit) commit
//!    together or not at all
//! 2. **Snapshot-Bound**: every precondition is checked against the same
//!    snapshot the writes are guarded by
//! 3. **Re-executable**: the attempt body has no side effects outside the
//!    commit, so conflict retries are safe
//! 4. **No Over-Grant**: `claimed_count` never exceeds `max_claims` and
//!    the sender balance never goes below what the claims paid out
//!
//! There is deliberately no per-user dedup: the same user may claim one
//! offer repeatedly until its slots run out.

pub mod error;
pub mod transactor;
pub mod types;
pub mod validator;

#[cfg(test)]
mod integration_tests;

// Re-exports for convenience
pub use error::{ClaimError, ErrorKind};
pub use transactor::{ClaimTransactor, DEFAULT_MAX_COMMIT_ATTEMPTS};
pub use types::{ClaimCommand, ClaimReceipt, Offer, UserAccount};
pub use validator::validate_claim_request;
