// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::auth::models::TokenPair;
use crate::config::JwtConfig;
use crate::roles::RoleName;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
///
/// Tokens carry exactly these three claims. Role changes only become
/// visible when a new token is issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: RoleName,
    pub exp: i64, // expiration, seconds since epoch
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    algorithm: Algorithm,
    access_token_duration: i64,  // in seconds
    refresh_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService from the JWT configuration
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            algorithm: config.algorithm,
            access_token_duration: config.access_token_minutes * 60,
            refresh_token_duration: config.refresh_token_days * 86_400,
        }
    }

    /// Generate a short-lived access token
    pub fn generate_access_token(
        &self,
        username: &str,
        role: RoleName,
    ) -> Result<String, AuthError> {
        self.generate_token(username, role, self.access_token_duration)
    }

    /// Generate a long-lived refresh token
    pub fn generate_refresh_token(
        &self,
        username: &str,
        role: RoleName,
    ) -> Result<String, AuthError> {
        self.generate_token(username, role, self.refresh_token_duration)
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(
        &self,
        username: &str,
        role: RoleName,
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(username, role)?,
            refresh_token: self.generate_refresh_token(username, role)?,
        })
    }

    /// Internal helper to generate a token with the given lifetime
    fn generate_token(
        &self,
        username: &str,
        role: RoleName,
        duration: i64,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            username: username.to_string(),
            role,
            exp: Utc::now().timestamp() + duration,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// Expired, tampered, malformed and wrong-algorithm tokens are all
    /// rejected identically as invalid.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is exact, with no grace period
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new(&JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            algorithm: Algorithm::HS256,
            access_token_minutes: 15,
            refresh_token_days: 7,
        })
    }

    #[test]
    fn test_access_token_expiration_is_15_minutes() {
        let service = test_token_service();
        let token = service
            .generate_access_token("alice", RoleName::User)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        let remaining = claims.exp - Utc::now().timestamp();
        assert!(
            remaining > 890 && remaining <= 900,
            "unexpected remaining lifetime: {}",
            remaining
        );
    }

    #[test]
    fn test_refresh_token_expiration_is_7_days() {
        let service = test_token_service();
        let token = service
            .generate_refresh_token("alice", RoleName::User)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        let remaining = claims.exp - Utc::now().timestamp();
        assert!(
            remaining > 604_790 && remaining <= 604_800,
            "unexpected remaining lifetime: {}",
            remaining
        );
    }

    #[test]
    fn test_token_claims_contain_identity() {
        let service = test_token_service();
        let token = service
            .generate_access_token("alice", RoleName::Admin)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, RoleName::Admin);
    }

    #[test]
    fn test_generate_token_pair() {
        let service = test_token_service();
        let pair = service.generate_token_pair("alice", RoleName::User).unwrap();

        // Both tokens should be valid
        assert!(service.validate_token(&pair.access_token).is_ok());
        assert!(service.validate_token(&pair.refresh_token).is_ok());

        // Tokens should be different
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        let malformed = [
            "",
            "not.a.token",
            "invalid_token_format",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ];
        for token in malformed {
            let result = service.validate_token(token);
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new(&JwtConfig {
            secret: "secret1".to_string(),
            algorithm: Algorithm::HS256,
            access_token_minutes: 15,
            refresh_token_days: 7,
        });
        let service2 = TokenService::new(&JwtConfig {
            secret: "secret2".to_string(),
            algorithm: Algorithm::HS256,
            access_token_minutes: 15,
            refresh_token_days: 7,
        });

        let token = service1
            .generate_access_token("alice", RoleName::User)
            .unwrap();

        assert!(service1.validate_token(&token).is_ok());
        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();

        let claims = Claims {
            username: "alice".to_string(),
            role: RoleName::User,
            exp: Utc::now().timestamp() - 500, // Expired 500 seconds ago
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_algorithm_is_rejected() {
        let hs256 = test_token_service();
        let hs512 = TokenService::new(&JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            algorithm: Algorithm::HS512,
            access_token_minutes: 15,
            refresh_token_days: 7,
        });

        let token = hs512
            .generate_access_token("alice", RoleName::User)
            .unwrap();

        assert!(hs512.validate_token(&token).is_ok());
        assert!(matches!(
            hs256.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_preserves_claims(
            username in "[a-z][a-z0-9_.-]{2,15}",
            admin in any::<bool>()
        ) {
            let service = test_token_service();
            let role = if admin { RoleName::Admin } else { RoleName::User };

            let token = service.generate_access_token(&username, role).unwrap();
            let claims = service.validate_token(&token).unwrap();

            prop_assert_eq!(claims.username, username);
            prop_assert_eq!(claims.role, role);
        }

        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();

            // Random strings should be rejected as invalid tokens
            let result = service.validate_token(&malformed);
            prop_assert!(result.is_err());
        }
    }
}
