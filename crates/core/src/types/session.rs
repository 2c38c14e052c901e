//! Session-stored user identity.

use serde::{Deserialize, Serialize};

/// Transient record of the currently authenticated user.
///
/// Stored in the visitor's session under the `user` key for the duration of
/// the browser session. Field names serialize in PascalCase to match the
/// users resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionUser {
    pub display_name: String,
    pub email_address: String,
    pub username: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_pascal_case_fields() {
        let user = SessionUser {
            display_name: "Test User".to_string(),
            email_address: "test@example.com".to_string(),
            username: "test".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "DisplayName": "Test User",
                "EmailAddress": "test@example.com",
                "Username": "test",
            })
        );

        let parsed: SessionUser = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, user);
    }
}
