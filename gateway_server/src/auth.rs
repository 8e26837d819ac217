//! Token verification for the gateway.
//!
//! The gateway never checks credentials itself: signature and expiry validation are delegated to an
//! external identity authority behind the [`IdentityAuthority`] trait. What this module owns is the
//! *shape* of the handshake: parsing the `Bearer` scheme, the [`Principal`] produced by a successful
//! verification, and the bundled [`JwtAuthority`] implementation that verifies HS256-signed id tokens
//! against a shared secret.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorInternalServerError, FromRequest, HttpMessage, HttpRequest};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{config::AuthConfig, errors::AuthError};

/// The verified caller identity. A `Principal` only ever exists as the output of successful credential
/// verification; it is never constructed from unvalidated input, lives for the duration of one request,
/// and is never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    /// Any additional claims the authority attached to the credential, preserved opaquely. They are kept
    /// in a separate mapping so an errant claim can never shadow the typed fields above.
    pub claims: Map<String, Value>,
}

/// The claim set an identity authority reports for a verified credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<IdTokenClaims> for Principal {
    fn from(claims: IdTokenClaims) -> Self {
        Self { uid: claims.sub, email: claims.email, email_verified: claims.email_verified, claims: claims.extra }
    }
}

/// Strip the `Bearer ` scheme off an `Authorization` header value.
///
/// The scheme check is case-sensitive with exactly one space, and an empty remainder is rejected. A header
/// that fails here fails *before* any authority contact.
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// The external identity authority boundary.
///
/// Implementations perform the actual cryptographic validation and expiry check. No retries happen behind
/// this trait: a transient authority outage surfaces as [`AuthError::CredentialInvalid`].
#[allow(async_fn_in_trait)]
pub trait IdentityAuthority {
    async fn verify_id_token(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Identity authority that verifies HS256-signed id tokens against a shared secret.
#[derive(Clone)]
pub struct JwtAuthority {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthority {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        Self { key, validation }
    }
}

impl IdentityAuthority for JwtAuthority {
    async fn verify_id_token(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<IdTokenClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::CredentialExpired,
            _ => {
                // The cause stays in the logs; callers only ever see the generic failure.
                debug!("🔐️ Token verification failed: {e}");
                AuthError::CredentialInvalid
            },
        })?;
        Ok(Principal::from(data.claims))
    }
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned().ok_or_else(|| {
            warn!("No principal found in request extensions. Is this route behind the auth middleware?");
            ErrorInternalServerError("No principal found in request extensions")
        });
        ready(principal)
    }
}
