use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub role: Role,
    pub active: bool,
}

/// One-shot password reset grant. Handed to the account owner out of band
/// and burned on use or expiry.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub token: String,
    pub user_id: String,
    pub expires_at: NaiveDateTime,
}

/// Closed set of authorization roles. Assigned at login, immutable for the
/// session's duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}
