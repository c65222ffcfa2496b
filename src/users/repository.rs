use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::roles::RoleName;
use crate::users::User;

/// Repository for user operations
#[derive(Clone)]
pub struct UsersRepository {
    pool: PgPool,
}

impl UsersRepository {
    /// Create a new UsersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user together with their personal role row
    ///
    /// Every user owns exactly one role row; it is created here with the
    /// given name in the same transaction as the user row.
    pub async fn create(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        username: &str,
        password_hash: &str,
        date_of_birth: Option<NaiveDate>,
        role: RoleName,
    ) -> Result<User, ApiError> {
        let mut tx = self.pool.begin().await?;

        let role_id: i32 = sqlx::query_scalar(
            "INSERT INTO roles (name) VALUES ($1) RETURNING id"
        )
        .bind(role)
        .fetch_one(&mut *tx)
        .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, username, password_hash, date_of_birth, role_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            "#
        )
        .bind(first_name)
        .bind(last_name)
        .bind(username)
        .bind(password_hash)
        .bind(date_of_birth)
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return ApiError::ConstraintViolation {
                        message: format!("User with username '{}' already exists", username),
                    };
                }
            }
            ApiError::from(e)
        })?;

        tx.commit().await?;

        Ok(user)
    }

    /// Find all users ordered by ID
    pub async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            FROM users
            ORDER BY id
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            FROM users
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Partially update a user
    ///
    /// Omitted fields keep their stored values; the username is fixed at
    /// registration and never touched here. The existence check and the
    /// update run in one transaction so they see the same row.
    pub async fn update(
        &self,
        id: i32,
        first_name: Option<String>,
        last_name: Option<String>,
        password_hash: Option<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> Result<User, ApiError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            FROM users
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            tracing::debug!("User with id {} not found for update", id);
            ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            }
        })?;

        // Update with provided fields, keeping existing values for omitted fields
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $1,
                last_name = $2,
                password_hash = $3,
                date_of_birth = $4
            WHERE id = $5
            RETURNING id, first_name, last_name, username, password_hash, date_of_birth, created_at, role_id
            "#
        )
        .bind(first_name.or(existing.first_name))
        .bind(last_name.or(existing.last_name))
        .bind(password_hash.unwrap_or(existing.password_hash))
        .bind(date_of_birth.or(existing.date_of_birth))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a user and the role row they own
    ///
    /// The role row may already be gone if it was deleted directly
    /// through the roles API; that case is not an error.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let role_id: Option<Option<i32>> = sqlx::query_scalar(
            "SELECT role_id FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let role_id = role_id.ok_or_else(|| {
            tracing::debug!("User with id {} not found for delete", id);
            ApiError::NotFound {
                resource: "User".to_string(),
                id: id.to_string(),
            }
        })?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(role_id) = role_id {
            sqlx::query("DELETE FROM roles WHERE id = $1")
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
