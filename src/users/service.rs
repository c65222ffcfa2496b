// User service orchestrating password hashing and persistence

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::users::{CreateUserRequest, UpdateUserRequest, User, UsersRepository};

/// Service for user lifecycle operations
///
/// Handlers never touch raw passwords: hashing happens here, before
/// anything reaches the repository.
#[derive(Clone)]
pub struct UserService {
    repo: UsersRepository,
    password_service: PasswordService,
}

impl UserService {
    /// Create a new UserService
    pub fn new(repo: UsersRepository, password_service: PasswordService) -> Self {
        Self {
            repo,
            password_service,
        }
    }

    /// Register a new user, hashing the password before storage
    ///
    /// The role row created alongside the user takes the requested name,
    /// or 'user' when the request does not name one.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let password_hash = self.password_service.hash_password(&request.password);

        self.repo
            .create(
                request.first_name.as_deref(),
                request.last_name.as_deref(),
                &request.username,
                &password_hash,
                request.date_of_birth,
                request.role.unwrap_or_default(),
            )
            .await
    }

    /// Apply a partial update, hashing the password when one is provided
    pub async fn update_user(&self, id: i32, request: UpdateUserRequest) -> Result<User, ApiError> {
        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.password_service.hash_password(password));

        self.repo
            .update(
                id,
                request.first_name,
                request.last_name,
                password_hash,
                request.date_of_birth,
            )
            .await
    }
}
