//! Claim Request Validator
//!
//! Rejects unauthenticated or malformed invocations before any storage
//! access. Pure validation, no side effects.
//!
//! The payload is inspected as raw JSON rather than deserialized into a
//! typed struct so that a non-string `offerId` surfaces as
//! [`ClaimError::InvalidArgument`] instead of a framework-level
//! deserialization failure.

use serde_json::Value;

use super::error::ClaimError;
use super::types::ClaimCommand;

/// Validate the caller identity and payload shape.
///
/// Produces the validated (claimer, offer) pair the transactor runs on.
/// The offer id must be a non-blank string; it is passed through
/// unmodified (the lookup key is the value the caller sent, not a trimmed
/// copy).
pub fn validate_claim_request(
    caller_uid: Option<&str>,
    payload: &Value,
) -> Result<ClaimCommand, ClaimError> {
    let uid = caller_uid.ok_or(ClaimError::Unauthenticated)?;

    let offer_id = payload
        .get("offerId")
        .and_then(Value::as_str)
        .ok_or(ClaimError::InvalidArgument)?;

    if offer_id.trim().is_empty() {
        return Err(ClaimError::InvalidArgument);
    }

    Ok(ClaimCommand {
        claimer_uid: uid.to_string(),
        offer_id: offer_id.to_string(),
    })
}
