use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::auth::PasswordService;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Ensure the admin account exists, creating it when missing
///
/// Safe to run on every start: when the username is already taken the
/// function does nothing, so restarts and concurrently starting
/// replicas cannot duplicate the account.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `password_service` - Hasher for the admin password
/// * `username` - Admin username
/// * `password` - Admin password in clear text
pub async fn ensure_admin(
    pool: &PgPool,
    password_service: &PasswordService,
    username: &str,
    password: &str,
) -> Result<(), sqlx::Error> {
    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        tracing::debug!("Admin user '{}' already exists", username);
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let role_id: i32 = sqlx::query_scalar("INSERT INTO roles (name) VALUES ('admin') RETURNING id")
        .fetch_one(&mut *tx)
        .await?;

    let password_hash = password_service.hash_password(password);

    let inserted = sqlx::query("INSERT INTO users (username, password_hash, role_id) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(&password_hash)
        .bind(role_id)
        .execute(&mut *tx)
        .await;

    if let Err(e) = inserted {
        // A concurrently starting instance won the race; dropping the
        // open transaction rolls back the orphan role row
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                tracing::debug!("Admin user '{}' was created concurrently", username);
                return Ok(());
            }
        }
        return Err(e);
    }

    tx.commit().await?;

    tracing::info!("Created admin user '{}'", username);
    Ok(())
}
