//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::claim::ClaimReceipt;
use crate::gateway::handlers::{ClaimApiRequest, ErrorDetail, ErrorResponse, HealthResponse};

/// Bearer-token authentication security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    Http::builder()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT issued by the identity provider; `sub` is the caller uid.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Offer Claim API",
        version = "1.0.0",
        description = "Claim a spot on an offer: transfers the per-claim payout from the offer's creator to the caller, atomically.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::claim_offer,
    ),
    components(
        schemas(
            ClaimApiRequest,
            ClaimReceipt,
            ErrorResponse,
            ErrorDetail,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Claim", description = "Offer claim operation (auth required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
