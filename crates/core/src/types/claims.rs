//! Identity claims carried in the login bearer token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::status::Role;
use super::user::User;

/// Payload of the bearer token issued by `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the token has expired at `now`. Tokens without `exp` never do.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|at| at <= now)
    }

    #[must_use]
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_expiry() {
        let claims: Claims = serde_json::from_str(
            r#"{"user_id": 1, "name": "ravi", "role": "admin", "exp": 1700000000}"#,
        )
        .unwrap();
        let before = DateTime::from_timestamp(1_699_999_999, 0).unwrap();
        let after = DateTime::from_timestamp(1_700_000_001, 0).unwrap();
        assert!(!claims.is_expired_at(before));
        assert!(claims.is_expired_at(after));
        assert!(claims.user().is_admin());
    }

    #[test]
    fn test_claims_without_expiry_never_expire() {
        let claims: Claims =
            serde_json::from_str(r#"{"user_id": 1, "name": "ravi", "role": "customer"}"#).unwrap();
        assert!(!claims.is_expired_at(Utc::now()));
    }
}
