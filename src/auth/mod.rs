//! User Identity
//!
//! The identity provider issues JWT bearer tokens out-of-band; this module
//! only verifies them and attaches the resulting uid to requests. The
//! claim core trusts the verified uid without further checks.

pub mod middleware;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (uid)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

/// Verified caller identity attached to each request.
///
/// `None` means the request carried no usable token; the validator turns
/// that into the `Unauthenticated` failure.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { uid: None }
    }

    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
        }
    }
}

/// Verifies (and, for dev tooling, issues) HS256 bearer tokens.
pub struct AuthVerifier {
    jwt_secret: String,
}

impl AuthVerifier {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Verify a JWT token and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Issue a token for a uid. Production tokens come from the external
    /// identity provider; this exists for the mock-api endpoints and tests.
    pub fn issue_token(&self, uid: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .context("token expiry out of range")?
            .timestamp();

        let claims = Claims {
            sub: uid.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to generate token")
    }
}
