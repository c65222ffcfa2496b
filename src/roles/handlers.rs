// HTTP handlers for role endpoints
//
// All role routes sit behind the admin guard; by the time a handler
// runs the caller is known to hold the admin role.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};

use crate::error::ApiError;
use crate::roles::{CreateRoleRequest, Role, UpdateRoleRequest};

/// Handler for POST /roles
/// Creates a new role, defaulting its name to 'user' when omitted
pub async fn create_role_handler(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Role>), ApiError> {
    let role = state
        .roles_repo
        .create(payload.name.unwrap_or_default())
        .await?;

    tracing::info!("Created role {} with name '{}'", role.id, role.name);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/roles/{}", role.id))],
        Json(role),
    ))
}

/// Handler for GET /roles
/// Retrieves all roles
pub async fn list_roles_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<Role>>, ApiError> {
    let roles = state.roles_repo.find_all().await?;

    Ok(Json(roles))
}

/// Handler for GET /roles/{id}
/// Retrieves a specific role by ID
pub async fn get_role_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Role>, ApiError> {
    let role = state
        .roles_repo
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound {
            resource: "Role".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(role))
}

/// Handler for PATCH /roles/{id}
/// Updates a role's name
pub async fn update_role_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<StatusCode, ApiError> {
    let name = payload.name.ok_or(ApiError::BadRequest {
        message: "No fields to update".to_string(),
    })?;

    let role = state.roles_repo.update(id, name).await?;

    tracing::info!("Updated role {} to name '{}'", role.id, role.name);
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /roles/{id}
/// Deletes a role; users holding it are detached, not deleted
pub async fn delete_role_handler(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.roles_repo.delete(id).await?;

    tracing::info!("Deleted role {}", id);
    Ok(StatusCode::NO_CONTENT)
}
