//! Claim Error Types
//!
//! Closed error taxonomy for the claim operation. Every failure carries a
//! machine-readable kind plus a fixed human-readable message; the gateway
//! decodes the pair at the boundary instead of parsing free text.

use thiserror::Error;

use crate::store::StoreError;

/// Machine-readable error kind surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Aborted,
    Internal,
}

/// Claim error types
#[derive(Error, Debug, Clone)]
pub enum ClaimError {
    // === Validation Errors (no storage access) ===
    #[error("You must be signed in.")]
    Unauthenticated,

    #[error("Missing or invalid offerId.")]
    InvalidArgument,

    // === Transaction Errors (abort, no writes) ===
    #[error("Offer not found")]
    OfferNotFound,

    #[error("Sender or claimer user document missing")]
    AccountMissing,

    #[error("All spots claimed")]
    SpotsExhausted,

    #[error("Sender has insufficient funds")]
    InsufficientFunds,

    // === Transient Errors ===
    #[error("Claim aborted after repeated write conflicts, please retry")]
    Aborted,

    // === System Errors ===
    #[error("Storage error: {0}")]
    Store(String),
}

impl ClaimError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::Unauthenticated => ErrorKind::Unauthenticated,
            ClaimError::InvalidArgument => ErrorKind::InvalidArgument,
            ClaimError::OfferNotFound | ClaimError::AccountMissing => ErrorKind::NotFound,
            ClaimError::SpotsExhausted | ClaimError::InsufficientFunds => {
                ErrorKind::FailedPrecondition
            }
            ClaimError::Aborted => ErrorKind::Aborted,
            ClaimError::Store(_) => ErrorKind::Internal,
        }
    }

    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorKind::Aborted => "ABORTED",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Unauthenticated => 401,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::FailedPrecondition => 422,
            ErrorKind::Aborted => 409,
            ErrorKind::Internal => 500,
        }
    }
}

impl From<StoreError> for ClaimError {
    fn from(e: StoreError) -> Self {
        match e {
            // A conflict that escapes the transactor's retry loop is terminal
            // for this invocation; the caller may retry the whole call.
            StoreError::WriteConflict => ClaimError::Aborted,
            StoreError::Backend(msg) => ClaimError::Store(msg),
        }
    }
}
