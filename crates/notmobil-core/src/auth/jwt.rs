//! Unverified inspection of JWT claims.
//!
//! The client never validates signatures; it only reads `exp` to decide
//! whether a stored token is worth sending.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

/// Tokens expiring within this window count as expired
pub const EXPIRY_SKEW_SECONDS: i64 = 60;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// `exp` claim of `token` in Unix seconds, if the token is readable
pub fn expires_at(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice::<Claims>(&bytes).ok()?.exp
}

/// Whether `token` is expired at `now` (Unix seconds). Unreadable tokens are expired.
pub fn is_expired(token: &str, now: i64) -> bool {
    expires_at(token).is_none_or(|exp| exp <= now.saturating_add(EXPIRY_SKEW_SECONDS))
}

#[cfg(test)]
pub(crate) fn unsigned_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"user_id":"user1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}
