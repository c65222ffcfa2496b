// Authorization middleware for protected routes
//
// Route policy is declared in one place: the routing table in main.rs
// attaches one of these guards to every protected route. Handlers never
// re-check permissions; they read the caller from the CurrentUser
// extension the guard inserted.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{error::AuthError, token::{Claims, TokenService}};
use crate::roles::RoleName;
use crate::AppState;

/// Identity of the caller, inserted by the guard middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub role: RoleName,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Present only on routes behind a guard; the guard decoded the
        // token and stashed the identity as an extension
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Decode the bearer token from the Authorization header
///
/// The 'Bearer ' prefix is accepted but not required; the raw token is
/// equally valid.
fn extract_claims(
    token_service: &TokenService,
    headers: &HeaderMap,
    endpoint: &str,
) -> Result<Claims, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!(
                "Missing Authorization header in request to protected endpoint: {}",
                endpoint
            );
            AuthError::MissingToken
        })?
        .to_str()
        .map_err(|_| {
            warn!(
                "Invalid Authorization header format for endpoint: {}",
                endpoint
            );
            AuthError::InvalidToken
        })?;

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);

    token_service.validate_token(token)
}

/// Guard for admin-only routes
///
/// Validates the caller's token, requires the admin role, and exposes
/// the identity to handlers as a CurrentUser extension.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Extract endpoint path for logging
    let endpoint = request.uri().path().to_string();

    let claims = extract_claims(&state.token_service, request.headers(), &endpoint)?;

    if claims.role != RoleName::Admin {
        warn!(
            "Authorization failed: username='{}', required_role={}, actual_role={}, endpoint={}",
            claims.username,
            RoleName::Admin,
            claims.role,
            endpoint
        );
        return Err(AuthError::InsufficientPermissions {
            required: RoleName::Admin,
            actual: claims.role,
        });
    }

    debug!(
        "Authorization successful: username='{}', role={}, endpoint={}",
        claims.username, claims.role, endpoint
    );
    request.extensions_mut().insert(CurrentUser {
        username: claims.username,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// Guard for routes addressing a single user record
///
/// Admins may touch any record; everyone else only the record whose ID
/// is their own.
pub async fn require_owner_or_admin(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    // Extract endpoint path for logging
    let endpoint = request.uri().path().to_string();

    let claims = extract_claims(&state.token_service, request.headers(), &endpoint)?;

    // Admins skip the ownership lookup entirely
    let caller_id = if claims.role == RoleName::Admin {
        None
    } else {
        state.auth_service.find_user_id(&claims.username).await?
    };

    if !is_owner_or_admin(claims.role, caller_id, id) {
        warn!(
            "Authorization failed: username='{}' may not access user {}, endpoint={}",
            claims.username, id, endpoint
        );
        return Err(AuthError::Forbidden(format!(
            "User '{}' may not access user {}",
            claims.username, id
        )));
    }

    debug!(
        "Authorization successful: username='{}', role={}, endpoint={}",
        claims.username, claims.role, endpoint
    );
    request.extensions_mut().insert(CurrentUser {
        username: claims.username,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

/// Ownership decision: admins may touch any record, everyone else only
/// the record matching their own user ID
pub fn is_owner_or_admin(role: RoleName, caller_id: Option<i32>, resource_id: i32) -> bool {
    role == RoleName::Admin || caller_id == Some(resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
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

    // Helper to create headers with an Authorization value
    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_claims_accepts_bearer_prefix() {
        let service = test_token_service();
        let token = service
            .generate_access_token("alice", RoleName::User)
            .unwrap();
        let headers = headers_with_auth(&format!("Bearer {}", token));

        let claims = extract_claims(&service, &headers, "/users/1").unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, RoleName::User);
    }

    #[test]
    fn test_extract_claims_accepts_raw_token() {
        let service = test_token_service();
        let token = service
            .generate_access_token("alice", RoleName::Admin)
            .unwrap();
        let headers = headers_with_auth(&token);

        let claims = extract_claims(&service, &headers, "/users").unwrap();
        assert_eq!(claims.role, RoleName::Admin);
    }

    #[test]
    fn test_extract_claims_missing_header() {
        let service = test_token_service();
        let headers = HeaderMap::new();

        let result = extract_claims(&service, &headers, "/users");
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_extract_claims_rejects_garbage() {
        let service = test_token_service();

        let garbage = ["Bearer not.a.token", "not_a_token", "Basic dXNlcjpwYXNz"];
        for value in garbage {
            let headers = headers_with_auth(value);
            let result = extract_claims(&service, &headers, "/users");
            assert!(matches!(result, Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_extract_claims_rejects_expired_token() {
        let service = test_token_service();

        let claims = Claims {
            username: "alice".to_string(),
            role: RoleName::User,
            exp: chrono::Utc::now().timestamp() - 500, // Expired
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();
        let headers = headers_with_auth(&format!("Bearer {}", token));

        let result = extract_claims(&service, &headers, "/users");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_current_user_extractor_reads_extension() {
        let request = Request::builder()
            .uri("/")
            .extension(CurrentUser {
                username: "alice".to_string(),
                role: RoleName::User,
            })
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let user = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, RoleName::User);
    }

    #[tokio::test]
    async fn test_current_user_extractor_missing_extension() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_is_owner_or_admin_decision_table() {
        // Admins can reach any record
        assert!(is_owner_or_admin(RoleName::Admin, None, 7));
        assert!(is_owner_or_admin(RoleName::Admin, Some(1), 7));

        // Users only their own record
        assert!(is_owner_or_admin(RoleName::User, Some(7), 7));
        assert!(!is_owner_or_admin(RoleName::User, Some(1), 7));
        assert!(!is_owner_or_admin(RoleName::User, None, 7));
    }

    proptest! {
        #[test]
        fn prop_admin_always_allowed(
            caller_id in proptest::option::of(1i32..10000),
            resource_id in 1i32..10000
        ) {
            prop_assert!(is_owner_or_admin(RoleName::Admin, caller_id, resource_id));
        }

        #[test]
        fn prop_user_only_own_record(
            caller_id in 1i32..10000,
            resource_id in 1i32..10000
        ) {
            let allowed = is_owner_or_admin(RoleName::User, Some(caller_id), resource_id);
            prop_assert_eq!(allowed, caller_id == resource_id);
        }
    }
}
