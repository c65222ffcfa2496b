// Database repository for authentication lookups

use crate::auth::error::AuthError;
use crate::roles::RoleName;
use crate::users::User;
use sqlx::PgPool;

/// Repository for the read-only lookups the auth flow needs
#[derive(Clone)]
pub struct AuthRepository {
    pool: PgPool,
}

impl AuthRepository {
    /// Create a new AuthRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            FROM users
            WHERE username = $1
            "#
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Look up the name of a role by ID
    pub async fn find_role_name(&self, role_id: i32) -> Result<Option<RoleName>, AuthError> {
        let name = sqlx::query_scalar::<_, RoleName>(
            "SELECT name FROM roles WHERE id = $1"
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(name)
    }

    /// Look up a user's ID by username
    pub async fn find_user_id(&self, username: &str) -> Result<Option<i32>, AuthError> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM users WHERE username = $1"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(id)
    }
}
