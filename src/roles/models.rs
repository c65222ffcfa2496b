use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role name enum covering the two access levels of the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    User,
    Admin,
}

impl RoleName {
    /// Convert role name to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::User => "user",
            RoleName::Admin => "admin",
        }
    }

    /// Parse role name from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "user" => Ok(RoleName::User),
            "admin" => Ok(RoleName::Admin),
            _ => Err(format!("Invalid role name: {}", s)),
        }
    }
}

impl Default for RoleName {
    fn default() -> Self {
        RoleName::User
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a role in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: RoleName,
}

/// Request DTO for creating a new role
///
/// The name defaults to 'user' when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: Option<RoleName>,
}

/// Request DTO for updating a role
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<RoleName>,
}
