// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::TokenPair,
    password::PasswordService,
    repository::AuthRepository,
    token::TokenService,
};
use crate::roles::RoleName;
use crate::users::User;

/// Authentication service coordinating login and token refresh
#[derive(Clone)]
pub struct AuthService {
    repo: AuthRepository,
    password_service: PasswordService,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        repo: AuthRepository,
        password_service: PasswordService,
        token_service: TokenService,
    ) -> Self {
        Self {
            repo,
            password_service,
            token_service,
        }
    }

    /// Log a user in with username and password, returning a token pair
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let (username, role) = self.authenticate(username, password).await?;
        self.token_service.generate_token_pair(&username, role)
    }

    /// Exchange a valid refresh token for a fresh token pair
    ///
    /// The caller's role is looked up again, so role changes made since
    /// the token was issued take effect on the new pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.token_service.validate_token(refresh_token)?;
        let (username, role) = self.resolve_identity(&claims.username).await?;
        self.token_service.generate_token_pair(&username, role)
    }

    /// Look up a user's ID by username, for ownership checks
    pub async fn find_user_id(&self, username: &str) -> Result<Option<i32>, AuthError> {
        self.repo.find_user_id(username).await
    }

    /// Check the password for a username and resolve the caller's identity
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, RoleName), AuthError> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Login failed: unknown username '{}'", username);
                AuthError::InvalidCredentials
            })?;

        if !self
            .password_service
            .verify_password(password, &user.password_hash)
        {
            tracing::debug!("Login failed: wrong password for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let role = self.role_of(&user).await?;
        Ok((user.username, role))
    }

    /// Resolve a username to its identity without checking a password
    ///
    /// Used by token refresh, where possession of a valid refresh token
    /// stands in for the password.
    async fn resolve_identity(&self, username: &str) -> Result<(String, RoleName), AuthError> {
        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Refresh failed: unknown username '{}'", username);
                AuthError::InvalidCredentials
            })?;

        let role = self.role_of(&user).await?;
        Ok((user.username, role))
    }

    /// Resolve the role for a user
    ///
    /// Users without a role row act as plain users.
    async fn role_of(&self, user: &User) -> Result<RoleName, AuthError> {
        match user.role_id {
            Some(role_id) => Ok(self
                .repo
                .find_role_name(role_id)
                .await?
                .unwrap_or_default()),
            None => Ok(RoleName::default()),
        }
    }
}
