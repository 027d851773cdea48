//! Storefront user identity.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::status::Role;

/// A storefront user as reported by the backend.
///
/// Login builds one from the decoded token claims; admin user search returns
/// them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ignores_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"user_id": 3, "name": "asha", "role": "admin", "email": "a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(user.id, UserId::new(3));
        assert!(user.is_admin());
    }
}
