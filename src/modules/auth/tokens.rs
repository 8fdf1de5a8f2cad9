use base64::{engine::general_purpose::STANDARD as base64, Engine as _};
use hmac::Mac;
use serde::{Deserialize, Serialize};

use crate::modules::error::PortalError;
use crate::modules::utils::time::get_current_timestamp;
use crate::{HmacSha256, SESSION_TTL_SECS};

/// Session payload carried inside a signed token.
///
/// The payload is only integrity-protected, not encrypted: the holder can
/// read it, but cannot alter it without invalidating the signature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub name: String,
    /// Absolute expiry instant (Unix seconds), always issuance + 7 days.
    pub exp: u64,
}

/// Why a token failed verification. Callers treat both the same way (deny);
/// the distinction exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong part count, or malformed base64/JSON.
    Invalid,
    /// Signature verified but `exp` is at or before the current time.
    Expired,
}

impl From<TokenError> for PortalError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => PortalError::TokenInvalid,
            TokenError::Expired => PortalError::TokenExpired,
        }
    }
}

/// Function to issue a signed session token
///
/// Wire form is `base64(JSON payload) "." hex(HMAC-SHA256 signature)`, where
/// the signature covers the base64 string's bytes.
pub fn issue_session(email: &str, name: &str, secret: &str) -> Result<String, PortalError> {
    let session = Session {
        email: email.to_string(),
        name: name.to_string(),
        exp: get_current_timestamp() + SESSION_TTL_SECS,
    };

    let json = serde_json::to_vec(&session)
        .map_err(|e| PortalError::Configuration(format!("session serialization failed: {}", e)))?;
    let payload = base64.encode(json);
    let signature = sign_payload(&payload, secret)?;

    Ok(format!("{}.{}", payload, signature))
}

/// Function to verify a session token and decode its payload
///
/// The signature is recomputed over the payload exactly as received, never
/// over a reparsed form, and checked with the Mac primitive's constant-time
/// comparison. Every decoding failure maps to `TokenError::Invalid`.
pub fn verify_session(token: &str, secret: &str) -> Result<Session, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(TokenError::Invalid);
    }
    let (payload, signature) = (parts[0], parts[1]);

    let signature_bytes = hex::decode(signature).map_err(|_| TokenError::Invalid)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::Invalid)?;
    mac.update(payload.as_bytes());
    if mac.verify_slice(&signature_bytes).is_err() {
        return Err(TokenError::Invalid);
    }

    // Signature checks out; only now is the payload worth decoding.
    let json = base64.decode(payload).map_err(|_| TokenError::Invalid)?;
    let session: Session = serde_json::from_slice(&json).map_err(|_| TokenError::Invalid)?;

    if session.exp <= get_current_timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(session)
}

/// Compute the hex-encoded HMAC-SHA256 signature over a payload string.
fn sign_payload(payload: &str, secret: &str) -> Result<String, PortalError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PortalError::Configuration(format!("invalid signing secret: {}", e)))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
