//! Structural decoding of bearer credential claims.
//!
//! A credential is `header.claims.signature`. Only the claims segment is read
//! and the signature is never checked, so nothing decoded here may be used for
//! an authorization decision. It feeds display, expiry detection and route
//! gating; the backend re-validates the credential on every request.
//!
//! WIRE FORMAT
//! ===========
//! `{"username": "...", "authorities": "ADMIN,USER", "exp": 1735689600}`.
//! Authorities arrive comma-joined; a JSON array is tolerated. In memory they
//! are always a `Vec<String>`.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

use crate::error::DecodeError;

const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims embedded in a credential.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_authorities")]
    pub authorities: Vec<String>,
    /// Expiry in seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Expiry as an instant. Out-of-range values clamp to the epoch, which
    /// reads as already expired.
    #[must_use]
    pub fn expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at() <= now
    }
}

/// Decode the claims segment of `credential`.
///
/// # Errors
///
/// Returns [`DecodeError`] when the credential is not three segments, the
/// middle segment is not base64, or the payload is not a claims object.
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let mut segments = credential.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(DecodeError::MissingSegment);
    };
    if payload.is_empty() {
        return Err(DecodeError::MissingSegment);
    }

    // Standard-alphabet payloads are folded onto the URL-safe alphabet.
    let normalized: String = payload
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = CLAIMS_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Split the comma-joined wire representation into authority names.
#[must_use]
pub fn split_authorities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthoritiesWire {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_authorities<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<AuthoritiesWire>::deserialize(deserializer)? {
        Some(AuthoritiesWire::Joined(raw)) => split_authorities(&raw),
        Some(AuthoritiesWire::List(list)) => split_authorities(&list.join(",")),
        None => Vec::new(),
    })
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod tests;
