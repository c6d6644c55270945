//! Read-only inspection of access-token claims.
//!
//! The client never verifies signatures; it only peeks at `exp` so an access
//! token that has plainly expired is not sent on a doomed profile request.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// Decodes the claims of a JWT access token. Returns `None` for opaque tokens.
pub fn inspect(token: &str) -> Option<TokenClaims> {
    let header = jsonwebtoken::decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .ok()
}

/// True only when the token is a JWT whose `exp` lies at or before `now`.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    inspect(token)
        .and_then(|claims| claims.expires_at())
        .map(|exp| exp <= now)
        .unwrap_or(false)
}
