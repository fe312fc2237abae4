//! Claim extraction and the access-token expiry policy.
//!
//! ERROR HANDLING
//! ==============
//! Every public function here is total. Decode failures are logged at debug
//! level and mapped to `None`/`0`/a fixed boolean so callers in the UI never
//! have to handle a [`MalformedToken`](crate::codec::MalformedToken).
//!
//! Time-dependent functions come in pairs: `foo(token)` reads the wall clock,
//! `foo_at(token, now_ms)` takes it as an argument.

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::clock::now_ms;
use crate::codec::{self, MalformedToken};

/// Long-form claim URI carrying the user's email.
pub const EMAIL_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
/// Long-form claim URI carrying the user id.
pub const SUBJECT_ID_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
/// Long-form claim URI carrying the user's role.
pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Refresh lead used when callers have no configured value.
pub const DEFAULT_REFRESH_LEAD_MINUTES: u32 = 5;

/// Typed view of a decoded payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedClaims {
    pub subject_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub expires_at_epoch_seconds: Option<i64>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl DecodedClaims {
    /// Decode and type a token's claims.
    ///
    /// # Errors
    ///
    /// Propagates [`MalformedToken`] from the codec.
    pub fn from_token(token: &str) -> Result<Self, MalformedToken> {
        codec::decode(token).map(|claims| Self::from_map(&claims))
    }

    fn from_map(claims: &Map<String, Value>) -> Self {
        Self {
            subject_id: string_claim(claims, SUBJECT_ID_CLAIM),
            email: string_claim(claims, EMAIL_CLAIM),
            role: string_claim(claims, ROLE_CLAIM),
            expires_at_epoch_seconds: claims.get("exp").and_then(epoch_seconds),
            issuer: string_claim(claims, "iss"),
            audience: string_claim(claims, "aud"),
        }
    }

    /// Identity triple, present only when all three claims are non-empty.
    #[must_use]
    pub fn identity(&self) -> Option<TokenIdentity> {
        Some(TokenIdentity {
            subject_id: self.subject_id.clone()?,
            email: self.email.clone()?,
            role: self.role.clone()?,
        })
    }
}

/// The claims required before a token can back an [`AuthUser`](crate::types::AuthUser).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentity {
    pub subject_id: String,
    pub email: String,
    pub role: String,
}

/// Human-oriented summary of a token, as printed by `token inspect`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDebugInfo {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub is_expired: bool,
    pub expires_at: Option<String>,
    pub time_until_expiry: Option<String>,
    pub is_valid: bool,
}

/// Read a string claim. Arrays (multi-valued role/audience) yield their first
/// string element; empty strings count as absent.
fn string_claim(claims: &Map<String, Value>, name: &str) -> Option<String> {
    let value = match claims.get(name)? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.iter().find_map(Value::as_str)?,
        _ => return None,
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[allow(clippy::cast_possible_truncation)]
/// `exp` as whole seconds. Zero reads as absent.
fn epoch_seconds(value: &Value) -> Option<i64> {
    if value.as_f64().is_some_and(|f| f == 0.0) {
        return None;
    }
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn decoded(token: &str, purpose: &str) -> Option<DecodedClaims> {
    match DecodedClaims::from_token(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::debug!("failed to decode token for {purpose}: {e}");
            None
        }
    }
}

/// User id from the long-form subject claim.
#[must_use]
pub fn subject_id(token: &str) -> Option<String> {
    decoded(token, "subject id")?.subject_id
}

/// Email from the long-form email claim.
#[must_use]
pub fn email(token: &str) -> Option<String> {
    decoded(token, "email")?.email
}

/// Role from the long-form role claim.
#[must_use]
pub fn role(token: &str) -> Option<String> {
    decoded(token, "role")?.role
}

/// Subject id, email and role, or `None` if any is missing or empty.
#[must_use]
pub fn user_info(token: &str) -> Option<TokenIdentity> {
    let identity = decoded(token, "user info")?.identity();
    if identity.is_none() {
        log::warn!("token missing required identity claims");
    }
    identity
}

/// Whether the token is expired at `now_ms`.
///
/// Tokens without `exp` never expire. Undecodable tokens are reported as
/// expired.
#[must_use]
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    let Some(claims) = decoded(token, "expiry check") else {
        return true;
    };
    match claims.expires_at_epoch_seconds {
        None => false,
        Some(exp) => now_ms >= exp.saturating_mul(1000),
    }
}

#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_ms())
}

/// Expiry instant from `exp`, if present and representable.
#[must_use]
pub fn expiration_date(token: &str) -> Option<OffsetDateTime> {
    let exp = decoded(token, "expiration date")?.expires_at_epoch_seconds?;
    OffsetDateTime::from_unix_timestamp(exp).ok()
}

/// Milliseconds until expiry at `now_ms`, floored at zero. Zero when the token
/// has no `exp` or cannot be decoded.
#[must_use]
pub fn time_until_expiration_at(token: &str, now_ms: i64) -> u64 {
    let Some(exp) = decoded(token, "time until expiration").and_then(|c| c.expires_at_epoch_seconds)
    else {
        return 0;
    };
    let remaining = exp.saturating_mul(1000).saturating_sub(now_ms);
    u64::try_from(remaining).unwrap_or(0)
}

#[must_use]
pub fn time_until_expiration(token: &str) -> u64 {
    time_until_expiration_at(token, now_ms())
}

/// True while the token is still valid but inside the refresh window.
/// Already-expired tokens need a fresh sign-in, not a refresh.
#[must_use]
pub fn should_refresh_at(token: &str, lead_minutes: u32, now_ms: i64) -> bool {
    let remaining = time_until_expiration_at(token, now_ms);
    let threshold = u64::from(lead_minutes) * 60_000;
    remaining > 0 && remaining < threshold
}

#[must_use]
pub fn should_refresh(token: &str, lead_minutes: u32) -> bool {
    should_refresh_at(token, lead_minutes, now_ms())
}

/// Summary of everything the policy knows about `token` at `now_ms`.
#[must_use]
pub fn debug_info_at(token: &str, now_ms: i64) -> TokenDebugInfo {
    let Some(claims) = decoded(token, "debug info") else {
        return TokenDebugInfo {
            user_id: None,
            email: None,
            role: None,
            is_expired: true,
            expires_at: None,
            time_until_expiry: None,
            is_valid: false,
        };
    };

    let remaining = time_until_expiration_at(token, now_ms);
    TokenDebugInfo {
        is_expired: is_expired_at(token, now_ms),
        expires_at: expiration_date(token).and_then(|d| d.format(&Rfc3339).ok()),
        time_until_expiry: (remaining > 0).then(|| format!("{} minutes", remaining / 60_000)),
        user_id: claims.subject_id,
        email: claims.email,
        role: claims.role,
        is_valid: true,
    }
}

#[must_use]
pub fn debug_info(token: &str) -> TokenDebugInfo {
    debug_info_at(token, now_ms())
}
