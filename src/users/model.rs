use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Email,
}

impl LoginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginType::Email => "email",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(LoginType::Email),
            _ => None,
        }
    }
}

/// Profile record of a registered user. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    /// Unique, compared case-sensitively
    pub login: String,
    pub login_type: LoginType,
    pub name: String,
    pub last_name: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A fresh profile with a newly generated id.
    pub fn new(login: String, name: String, last_name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            login,
            login_type: LoginType::Email,
            name,
            last_name,
            last_login_at: None,
            created_at: now,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.last_name).trim().to_string()
    }
}

/// Password record stored separately from the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: Uuid,
    pub password_hash: String,
    /// Password lifetime policy; recorded, not enforced at login.
    pub expires_at: Option<DateTime<Utc>>,
}
