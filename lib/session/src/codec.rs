//! Unverified token decoding.
//!
//! A token is `base64url(header).base64url(payload).signature`. Only the
//! payload is read and the signature is never checked: a successful decode
//! means the token is syntactically valid, not that it is authentic. The
//! transport is the trust boundary.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::MalformedTokenError;

/// Claims carried in a token payload.
///
/// Only `exp` takes part in authorization decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry, in seconds since the Unix epoch.
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    /// Issued-at, in seconds since the Unix epoch.
    #[serde(default, deserialize_with = "optional_numeric_date")]
    pub iat: Option<i64>,
    /// Every other claim, kept for diagnostics.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Returns the expiry as a timestamp, if it is representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns true if the token is expired at `now`.
    ///
    /// A token is no longer trusted at the second named by `exp`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns true if the token expires within `window` of `now` (or already has).
    #[must_use]
    pub fn expires_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.exp.saturating_sub(now.timestamp()) <= window.num_seconds()
    }
}

/// Decodes the payload of `token` into [`Claims`] without verifying it.
///
/// # Errors
///
/// Returns [`MalformedTokenError`] if the token does not have three
/// segments, the payload is not base64url, or the payload is not a JSON
/// object with a numeric `exp`.
pub fn decode(token: &str) -> Result<Claims, MalformedTokenError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(MalformedTokenError::new(
            "expected three dot-separated segments",
        ));
    };

    if payload.is_empty() {
        return Err(MalformedTokenError::new("empty payload segment"));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| MalformedTokenError::new(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| MalformedTokenError::new(format!("payload is not a claims object: {e}")))
}

fn number_to_seconds(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|secs| secs.is_finite())
            .map(|secs| secs.floor() as i64)
    })
}

fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number_to_seconds(&number)
        .ok_or_else(|| serde::de::Error::custom("not a valid NumericDate"))
}

fn optional_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<Number>::deserialize(deserializer)?;
    Ok(number.as_ref().and_then(number_to_seconds))
}
