//! Authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular user - todo CRUD and export
    User,
    /// Administrator - full access
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "USER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Authenticated user record, as persisted in session storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            role,
            enabled: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token refresh body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Successful response from register, login and refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "type", default = "default_token_type")]
    pub token_type: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthResponse {
    /// The user record carried by this response
    pub fn user(&self) -> User {
        User::new(self.username.clone(), self.email.clone(), self.role)
    }
}

/// Snapshot of the current session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub is_authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, UserRole::User);
        assert!(serde_json::from_str::<UserRole>("\"viewer\"").is_err());
    }

    #[test]
    fn test_auth_response_parses_backend_shape() {
        let json = r#"{"token":"abc","type":"Bearer","username":"alice","email":"a@b.io","role":"ADMIN","expiresIn":3600}"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);

        let user = response.user();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.id.is_none());
    }

    #[test]
    fn test_user_optional_fields_skipped() {
        let user = User::new("bob", "bob@example.com", UserRole::User);
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(
            json,
            r#"{"username":"bob","email":"bob@example.com","role":"USER"}"#
        );
    }
}
