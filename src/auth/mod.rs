// Authentication module
// Provides JWT-based login, token refresh, PBKDF2 password hashing and
// the route guards for role- and ownership-based access control

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, refresh_handler};
pub use middleware::{require_admin, require_owner_or_admin, CurrentUser};
pub use models::{LoginRequest, RefreshRequest, TokenPair};
pub use password::PasswordService;
pub use repository::AuthRepository;
pub use service::AuthService;
pub use token::{Claims, TokenService};
