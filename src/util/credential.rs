//! Client-side credential decoding.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues a compact three-part signed token. The client never
//! verifies the signature; it only reads the payload segment to learn the
//! expiry and subject so the session store can decide whether a persisted
//! credential is still usable.

#[cfg(test)]
#[path = "credential_test.rs"]
mod credential_test;

use std::fmt;

use base64::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Why a credential could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("credential must have three dot-separated segments")]
    Malformed,
    #[error("credential payload is not valid base64")]
    Encoding,
    #[error("credential payload is not valid claims JSON: {0}")]
    Payload(String),
}

/// Identifier of the authenticated user.
///
/// Backends emit this as either a JSON number or a string; both normalize to
/// the same textual form so it can be dropped straight into request paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for SubjectId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Numeric ids go back on the wire as numbers, everything else as strings.
impl Serialize for SubjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(int) => serializer.serialize_i64(int),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) if !s.is_empty() => Ok(Self(s)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Self(int.to_string()));
                }
                if let Some(uint) = number.as_u64() {
                    return Ok(Self(uint.to_string()));
                }
                #[allow(clippy::cast_possible_truncation)]
                if let Some(float) = number.as_f64()
                    && float.is_finite()
                    && float.fract() == 0.0
                {
                    return Ok(Self((float as i64).to_string()));
                }
                Ok(Self(number.to_string()))
            }
            _ => Err(D::Error::custom("expected non-empty string or number subject id")),
        }
    }
}

/// Decoded credential payload. Unknown claims are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CredentialClaims {
    /// Expiry in epoch seconds.
    #[serde(default)]
    pub exp: Option<f64>,
    /// Subject of the credential. Unusable ids (empty, boolean, nested)
    /// decode as `None` rather than rejecting the claims.
    #[serde(default, deserialize_with = "lenient_subject_id")]
    pub id: Option<SubjectId>,
}

fn lenient_subject_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SubjectId>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    match SubjectId::deserialize(raw) {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            leptos::logging::warn!("ignoring unusable credential subject: {e}");
            Ok(None)
        }
    }
}

impl CredentialClaims {
    /// A credential is live only with an expiry strictly after `now`.
    pub fn is_live(&self, now: f64) -> bool {
        self.exp.is_some_and(|exp| exp > now)
    }
}

/// Decode the payload segment of `token` without verifying its signature.
///
/// # Errors
///
/// Returns [`CredentialError`] when the token is not three segments, the
/// payload is not base64, or the payload is not a claims object.
pub fn decode_claims(token: &str) -> Result<CredentialClaims, CredentialError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(CredentialError::Malformed);
    };
    if payload.is_empty() {
        return Err(CredentialError::Malformed);
    }

    let bytes = decode_segment(payload)?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| CredentialError::Payload(e.to_string()))?;
    if !claims.is_object() {
        return Err(CredentialError::Payload("claims must be a JSON object".to_owned()));
    }
    serde_json::from_value(claims).map_err(|e| CredentialError::Payload(e.to_string()))
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, CredentialError> {
    let unpadded = segment.trim_end_matches('=');
    BASE64_URL_SAFE_NO_PAD
        .decode(unpadded)
        .or_else(|_| BASE64_STANDARD_NO_PAD.decode(unpadded))
        .map_err(|_| CredentialError::Encoding)
}

/// Encode claims into an unsigned token of the expected shape.
#[cfg(test)]
pub(crate) fn unsigned_token(claims: &serde_json::Value) -> String {
    let header = BASE64_URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = BASE64_URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
