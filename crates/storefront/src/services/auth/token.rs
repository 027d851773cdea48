//! Client-side bearer token decoding.
//!
//! The payload segment is decoded without verifying the signature; the
//! backend verifies it on every request.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use minie_core::Claims;
use secrecy::{ExposeSecret, SecretString};

use super::AuthError;
use crate::session::Session;

/// Decode the claims carried in a JWT.
///
/// # Errors
///
/// Returns `AuthError::MalformedToken` unless the token has three segments
/// and a base64url JSON payload with the expected claims.
pub fn decode_claims(token: &str) -> Result<Claims, AuthError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(AuthError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
}

/// Build a session from a raw bearer token.
///
/// # Errors
///
/// Returns `AuthError::MalformedToken` if the claims cannot be decoded.
pub fn session_from_token(token: SecretString) -> Result<Session, AuthError> {
    let claims = decode_claims(token.expose_secret())?;
    Ok(Session::new(token, claims.user(), claims.expires_at()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use minie_core::{Role, UserId};

    /// Build an unsigned token carrying `claims`.
    pub(crate) fn token_for(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_claims() {
        let token = token_for(&serde_json::json!({
            "user_id": 4,
            "role": "admin",
            "name": "meera",
            "exp": 1_900_000_000
        }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id, UserId::new(4));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, "meera");
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(matches!(
            decode_claims("abc.def"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(decode_claims("a.b.c.d").is_err());
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode("not json");
        assert!(decode_claims(&format!("h.{payload}.s")).is_err());
    }

    #[test]
    fn test_session_from_token() {
        let token = token_for(&serde_json::json!({"user_id": 9, "role": "customer", "name": "dev"}));
        let session = session_from_token(SecretString::from(token)).unwrap();
        assert_eq!(session.user().name, "dev");
        assert!(!session.is_admin());
        assert!(session.expires_at().is_none());
    }
}
