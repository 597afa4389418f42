//! Gateway request handlers

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::AppState;
use crate::auth::Identity;
use crate::claim::{ClaimError, ClaimReceipt, validate_claim_request};

/// Error body: machine-readable kind plus human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Stable error kind, e.g. `FAILED_PRECONDITION`
    #[schema(example = "FAILED_PRECONDITION")]
    pub kind: String,
    #[schema(example = "All spots claimed")]
    pub message: String,
}

impl ErrorResponse {
    fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }
}

/// Documented request shape for the claim endpoint. The handler inspects
/// the raw JSON so malformed shapes map to `INVALID_ARGUMENT` rather than
/// a framework rejection; this type exists for the API docs.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ClaimApiRequest {
    #[serde(rename = "offerId")]
    #[schema(example = "o1")]
    pub offer_id: String,
}

/// Map a claim failure onto the wire: status code + (kind, message) body.
fn reject(e: ClaimError) -> (StatusCode, Json<ErrorResponse>) {
    if let ClaimError::Store(ref msg) = e {
        tracing::error!(error = %msg, "claim failed on storage backend");
    }
    let status = StatusCode::from_u16(e.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(e.code(), e.to_string())))
}

/// Claim one spot on an offer
///
/// POST /api/v1/offer/claim
///
/// Moves the offer's per-claim amount from its creator to the caller.
/// All-or-nothing under concurrency: the spot count and both balances
/// move together or not at all.
#[utoipa::path(
    post,
    path = "/api/v1/offer/claim",
    request_body = ClaimApiRequest,
    responses(
        (status = 200, description = "Claim committed", body = ClaimReceipt),
        (status = 400, description = "Missing or invalid offerId", body = ErrorResponse),
        (status = 401, description = "No authenticated caller", body = ErrorResponse),
        (status = 404, description = "Offer or account record missing", body = ErrorResponse),
        (status = 409, description = "Aborted after repeated write conflicts, retry", body = ErrorResponse),
        (status = 422, description = "Spots exhausted or insufficient creator funds", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Claim"
)]
pub async fn claim_offer(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ClaimReceipt>), (StatusCode, Json<ErrorResponse>)> {
    let cmd = validate_claim_request(identity.uid.as_deref(), &payload).map_err(reject)?;

    tracing::debug!(offer_id = %cmd.offer_id, claimer_uid = %cmd.claimer_uid, "claim request");

    let receipt = state.transactor.claim(&cmd).await.map_err(reject)?;
    Ok((StatusCode::OK, Json(receipt)))
}

/// Health check response data
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Health check endpoint
///
/// Probes the store backend; does not expose internal details.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Store unavailable", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                }),
            )
        }
    }
}

// ============================================================================
// Mock endpoints (dev/test seeding; compiled out of production builds)
// ============================================================================

#[cfg(feature = "mock-api")]
pub mod mock {
    use super::*;
    use crate::claim::{Offer, UserAccount};

    #[derive(Debug, Serialize)]
    pub struct Seeded {
        pub seeded: bool,
    }

    /// Upsert an offer record (stands in for the external creation flow).
    pub async fn put_offer(
        State(state): State<Arc<AppState>>,
        Json(offer): Json<Offer>,
    ) -> Result<Json<Seeded>, (StatusCode, Json<ErrorResponse>)> {
        state
            .store
            .put_offer(offer)
            .await
            .map_err(|e| reject(ClaimError::from(e)))?;
        Ok(Json(Seeded { seeded: true }))
    }

    /// Upsert a user account record (stands in for the funding flow).
    pub async fn put_account(
        State(state): State<Arc<AppState>>,
        Json(account): Json<UserAccount>,
    ) -> Result<Json<Seeded>, (StatusCode, Json<ErrorResponse>)> {
        state
            .store
            .put_account(account)
            .await
            .map_err(|e| reject(ClaimError::from(e)))?;
        Ok(Json(Seeded { seeded: true }))
    }

    #[derive(Debug, Deserialize)]
    pub struct TokenRequest {
        pub uid: String,
    }

    #[derive(Debug, Serialize)]
    pub struct TokenResponse {
        pub token: String,
    }

    /// Issue a 24h bearer token (stands in for the identity provider).
    pub async fn issue_token(
        State(state): State<Arc<AppState>>,
        Json(req): Json<TokenRequest>,
    ) -> Result<Json<TokenResponse>, (StatusCode, Json<ErrorResponse>)> {
        let token = state
            .auth
            .issue_token(&req.uid, chrono::Duration::hours(24))
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("INTERNAL", e.to_string())),
                )
            })?;
        Ok(Json(TokenResponse { token }))
    }
}
