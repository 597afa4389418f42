//! Claim Core Types
//!
//! Record types for the two persistent collections (offers, user accounts)
//! and the command/receipt pair flowing through the claim operation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A claimable offer.
///
/// Created by an external offer-creation flow; this service only ever
/// increments `claimed_count`. `max_claims` and `amount_per_claim_cents`
/// are immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Offer {
    /// Offer key
    #[schema(example = "o1")]
    pub offer_id: String,
    /// Account that funds each claim
    #[schema(example = "u1")]
    pub creator_uid: String,
    /// Claims granted so far. Invariant: `claimed_count <= max_claims`.
    #[serde(default)]
    pub claimed_count: u32,
    /// Total claim slots
    #[schema(example = 5)]
    pub max_claims: u32,
    /// Payout per claim, integer cents
    #[schema(example = 200)]
    pub amount_per_claim_cents: i64,
}

impl Offer {
    /// All claim slots are taken.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.claimed_count >= self.max_claims
    }
}

/// A user balance record.
///
/// Also mutated by out-of-scope flows (deposits, other claims); the claim
/// transaction must tolerate concurrent external writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserAccount {
    /// User key, matches the authenticated identity
    #[schema(example = "u2")]
    pub uid: String,
    /// Balance in integer cents. A record stored without a balance reads
    /// as zero.
    #[serde(default)]
    pub balance_cents: i64,
}

/// Validated claim invocation: who is claiming which offer.
///
/// Produced by the request validator; the transactor never sees raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimCommand {
    pub claimer_uid: String,
    pub offer_id: String,
}

/// Acknowledgement returned to the caller on success.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimReceipt {
    #[schema(example = true)]
    pub success: bool,
}

impl ClaimReceipt {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
