use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::roles::RoleName;
use crate::validation::{validate_person_name, validate_username};

/// Domain model representing a user in the database
///
/// Deliberately not Serialize: the password hash must never reach a
/// client, so responses go through UserResponse instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub password_hash: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub role_id: Option<i32>,
}

/// Response DTO for a user, excluding the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub role_id: Option<i32>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            date_of_birth: user.date_of_birth,
            created_at: user.created_at,
            role_id: user.role_id,
        }
    }
}

/// Request DTO for registering a new user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(max = 150, message = "First name must be at most 150 characters"),
        custom = "validate_person_name"
    )]
    pub first_name: Option<String>,

    #[validate(
        length(max = 150, message = "Last name must be at most 150 characters"),
        custom = "validate_person_name"
    )]
    pub last_name: Option<String>,

    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom = "validate_username"
    )]
    pub username: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    pub date_of_birth: Option<NaiveDate>,

    /// Name for the role row created alongside the user; defaults to
    /// 'user' when omitted
    pub role: Option<RoleName>,
}

/// Request DTO for partially updating a user
///
/// Absent fields keep their stored values. The username and the role
/// are fixed at registration and cannot be changed here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(max = 150, message = "First name must be at most 150 characters"),
        custom = "validate_person_name"
    )]
    pub first_name: Option<String>,

    #[validate(
        length(max = 150, message = "Last name must be at most 150 characters"),
        custom = "validate_person_name"
    )]
    pub last_name: Option<String>,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,

    pub date_of_birth: Option<NaiveDate>,
}

impl UpdateUserRequest {
    /// Returns true when the request carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
            && self.date_of_birth.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            username: "ada".to_string(),
            password_hash: "c2VjcmV0".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10),
            created_at: Utc::now(),
            role_id: Some(2),
        }
    }

    #[test]
    fn test_user_response_excludes_password_hash() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "ada");
        assert_eq!(json["role_id"], 2);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_create_user_request_deserialization() {
        let json = r#"{
            "first_name": "Ada",
            "last_name": "Lovelace",
            "username": "ada",
            "password": "pw1",
            "date_of_birth": "1815-12-10"
        }"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "ada");
        assert_eq!(request.password, "pw1");
        assert_eq!(
            request.date_of_birth,
            NaiveDate::from_ymd_opt(1815, 12, 10)
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_minimal() {
        let json = r#"{"username": "bob", "password": "pw1"}"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert!(request.first_name.is_none());
        assert!(request.last_name.is_none());
        assert!(request.date_of_birth.is_none());
        assert!(request.role.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_request_accepts_role() {
        let json = r#"{"username": "bob", "password": "pw1", "role": "admin"}"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, Some(RoleName::Admin));

        let json = r#"{"username": "bob", "password": "pw1", "role": "superuser"}"#;
        assert!(serde_json::from_str::<CreateUserRequest>(json).is_err());
    }

    #[test]
    fn test_create_user_request_rejects_bad_username() {
        let json = r#"{"username": "has space", "password": "pw1"}"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_user_request_rejects_empty_password() {
        let json = r#"{"username": "bob", "password": ""}"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_user_request_rejects_blank_name() {
        let json = r#"{"first_name": "   ", "username": "bob", "password": "pw1"}"#;

        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_user_request_empty() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_user_request_partial() {
        let json = r#"{"password": "newpw"}"#;

        let request: UpdateUserRequest = serde_json::from_str(json).unwrap();
        assert!(!request.is_empty());
        assert_eq!(request.password.as_deref(), Some("newpw"));
        assert!(request.first_name.is_none());
        assert!(request.validate().is_ok());
    }
}
