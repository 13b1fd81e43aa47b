//! Bearer Token Signing
//!
//! Stateless signed tokens of the form `base64url(claims).base64url(mac)`.
//! Claims carry the session version they were issued under; whether that
//! version is still current is checked against the stored user, not here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Token flavor, bound into the signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Session version at issue time
    pub ver: i32,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
    /// Token kind
    pub kind: TokenKind,
}

impl SessionClaims {
    pub fn new(user_id: UserId, version: i32, ttl_secs: i64, kind: TokenKind) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.into_uuid(),
            ver: version,
            iat: now,
            exp: now + ttl_secs,
            kind,
        }
    }

    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.sub)
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Access and refresh tokens issued together
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Sign claims into a compact token
pub fn sign_token(claims: &SessionClaims, secret: &[u8; 32]) -> AuthResult<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| AuthError::Internal(format!("claims serialization: {e}")))?;
    let payload_b64 = URL_SAFE_NO_PAD.encode(&payload);

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!(
        "{}.{}",
        payload_b64,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Verify a token signature and expiry, returning its claims
///
/// Every failure mode maps to the same opaque error.
pub fn verify_token(
    token: &str,
    secret: &[u8; 32],
    expected_kind: TokenKind,
) -> AuthResult<SessionClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err(AuthError::TokenInvalid);
    }

    let payload_b64 = parts[0];
    let signature_b64 = parts[1];

    // Verify signature
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload_b64.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::TokenInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::TokenInvalid)?;

    // Decode claims
    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| AuthError::TokenInvalid)?;
    let claims: SessionClaims =
        serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;

    if claims.kind != expected_kind || claims.is_expired() {
        return Err(AuthError::TokenInvalid);
    }

    Ok(claims)
}

/// Issue a fresh access/refresh pair for a user
pub fn issue_pair(user_id: UserId, version: i32, config: &AuthConfig) -> AuthResult<TokenPair> {
    let access = SessionClaims::new(
        user_id,
        version,
        config.access_ttl_secs(),
        TokenKind::Access,
    );
    let refresh = SessionClaims::new(
        user_id,
        version,
        config.refresh_ttl_secs(),
        TokenKind::Refresh,
    );

    Ok(TokenPair {
        access_token: sign_token(&access, &config.token_secret)?,
        refresh_token: sign_token(&refresh, &config.token_secret)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> [u8; 32] {
        [7u8; 32]
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let user_id = UserId::new();
        let claims = SessionClaims::new(user_id, 3, 3600, TokenKind::Access);
        let token = sign_token(&claims, &secret()).unwrap();

        let verified = verify_token(&token, &secret(), TokenKind::Access).unwrap();
        assert_eq!(verified.user_id(), user_id);
        assert_eq!(verified.ver, 3);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let claims = SessionClaims::new(UserId::new(), 0, 3600, TokenKind::Access);
        let token = sign_token(&claims, &secret()).unwrap();

        let other = SessionClaims::new(UserId::new(), 0, 3600, TokenKind::Access);
        let other_token = sign_token(&other, &secret()).unwrap();

        // Payload from one token with the signature of another
        let forged = format!(
            "{}.{}",
            token.split('.').next().unwrap(),
            other_token.split('.').nth(1).unwrap()
        );
        assert!(verify_token(&forged, &secret(), TokenKind::Access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = SessionClaims::new(UserId::new(), 0, 3600, TokenKind::Access);
        let token = sign_token(&claims, &secret()).unwrap();
        assert!(verify_token(&token, &[8u8; 32], TokenKind::Access).is_err());
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let claims = SessionClaims::new(UserId::new(), 0, 3600, TokenKind::Refresh);
        let token = sign_token(&claims, &secret()).unwrap();
        assert!(verify_token(&token, &secret(), TokenKind::Access).is_err());
        assert!(verify_token(&token, &secret(), TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_expired_rejected() {
        let claims = SessionClaims::new(UserId::new(), 0, -10, TokenKind::Access);
        let token = sign_token(&claims, &secret()).unwrap();
        assert!(verify_token(&token, &secret(), TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token("", &secret(), TokenKind::Access).is_err());
        assert!(verify_token("a.b.c", &secret(), TokenKind::Access).is_err());
        assert!(verify_token("not-a-token", &secret(), TokenKind::Access).is_err());
    }
}
