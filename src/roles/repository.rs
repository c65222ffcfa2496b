use sqlx::PgPool;

use crate::error::ApiError;
use crate::roles::{Role, RoleName};

/// Repository for role operations
#[derive(Clone)]
pub struct RolesRepository {
    pool: PgPool,
}

impl RolesRepository {
    /// Create a new RolesRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new role
    pub async fn create(&self, name: RoleName) -> Result<Role, ApiError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name) VALUES ($1) RETURNING id, name"
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    /// Find all roles ordered by ID
    pub async fn find_all(&self) -> Result<Vec<Role>, ApiError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name FROM roles ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    /// Find a role by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Role>, ApiError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name FROM roles WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    /// Update a role's name
    pub async fn update(&self, id: i32, name: RoleName) -> Result<Role, ApiError> {
        let role = sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = $1 WHERE id = $2 RETURNING id, name"
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Role".to_string(),
            id: id.to_string(),
        })?;

        Ok(role)
    }

    /// Delete a role by ID
    ///
    /// Users referencing the role are kept; the foreign key sets their
    /// role_id to NULL and they act as plain users from then on.
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound {
                resource: "Role".to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Repository methods run against a live database and are covered by
    // the ignored integration tests in crate::tests.
}
