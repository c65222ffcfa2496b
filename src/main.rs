mod auth;
mod config;
mod db;
mod error;
mod roles;
mod users;
mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;

use auth::{
    login_handler, refresh_handler, require_admin, require_owner_or_admin, AuthRepository,
    AuthService, PasswordService, TokenService,
};
use config::AppConfig;
use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_roles_handler,
    update_role_handler, RolesRepository,
};
use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler, UserService, UsersRepository,
};

/// Application state shared across handlers and guards
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub users_repo: UsersRepository,
    pub roles_repo: RolesRepository,
    pub auth_service: AuthService,
    pub token_service: TokenService,
}

/// Creates and configures the application router
///
/// The routing table is the single place where access policy lives:
/// every protected route names its guard right where it is registered,
/// so a reader can see who may call what without visiting the handlers.
pub fn create_router(db: PgPool, config: &AppConfig) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let password_service = PasswordService::new(&config.hashing);
    let token_service = TokenService::new(&config.jwt);

    let users_repo = UsersRepository::new(db.clone());
    let roles_repo = RolesRepository::new(db.clone());
    let auth_repo = AuthRepository::new(db);

    let user_service = UserService::new(users_repo.clone(), password_service.clone());
    let auth_service = AuthService::new(auth_repo, password_service, token_service.clone());

    let state = AppState {
        user_service,
        users_repo,
        roles_repo,
        auth_service,
        token_service,
    };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = middleware::from_fn_with_state(state.clone(), require_admin);
    let owner_or_admin = middleware::from_fn_with_state(state.clone(), require_owner_or_admin);

    Router::new()
        // Open routes
        .route("/login", post(login_handler))
        .route("/login/refresh", put(refresh_handler))
        .route("/users", post(create_user_handler))
        // Admin only
        .route("/users", get(list_users_handler).route_layer(admin.clone()))
        .route(
            "/roles",
            post(create_role_handler)
                .get(list_roles_handler)
                .route_layer(admin.clone()),
        )
        .route(
            "/roles/:id",
            get(get_role_handler)
                .patch(update_role_handler)
                .delete(delete_role_handler)
                .route_layer(admin),
        )
        // Owner or admin
        .route(
            "/users/:id",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler)
                .route_layer(owner_or_admin),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    // This enables the error!, warn!, info!, debug!, and trace! macros
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Identity API - Starting...");

    // Load configuration from environment variables
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Seed the admin account when credentials are configured
    match &config.admin.password {
        Some(password) => {
            let password_service = PasswordService::new(&config.hashing);
            db::ensure_admin(&db_pool, &password_service, &config.admin.username, password)
                .await
                .expect("Failed to create admin user");
        }
        None => {
            tracing::warn!("ADMIN_PASSWORD is not set; skipping admin bootstrap");
        }
    }

    // Create the application router
    let app = create_router(db_pool, &config);

    // Start the Axum server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Identity API is running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
