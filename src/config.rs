// Application configuration loaded from environment variables

use jsonwebtoken::Algorithm;
use std::str::FromStr;

/// Errors produced while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Pseudo-random function used by the password hasher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPrf {
    Sha256,
    Sha512,
}

impl HashPrf {
    /// Convert the PRF to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HashPrf::Sha256 => "sha256",
            HashPrf::Sha512 => "sha512",
        }
    }

    /// Parse a PRF from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "sha256" => Ok(HashPrf::Sha256),
            "sha512" => Ok(HashPrf::Sha512),
            _ => Err(format!("Invalid hash PRF: {}", s)),
        }
    }
}

impl std::fmt::Display for HashPrf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bind address for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Password hashing parameters
///
/// The salt is a single configured value shared by every stored hash.
/// Deployments that already hold hashes derived with it cannot rotate
/// it without invalidating every password.
#[derive(Debug, Clone)]
pub struct HashingConfig {
    pub prf: HashPrf,
    pub salt: String,
    pub iterations: u32,
}

/// JWT signing parameters and token lifetimes
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

/// Credentials for the admin account seeded at startup
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: Option<String>,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub hashing: HashingConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load the configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port_raw = env_or("PORT", "8080");
        let port = port_raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
            var: "PORT",
            value: port_raw,
            reason: e.to_string(),
        })?;

        let database_url = require("DATABASE_URL")?;

        let prf_raw = env_or("HASH_PRF", "sha256");
        let prf = HashPrf::from_str(&prf_raw).map_err(|reason| ConfigError::Invalid {
            var: "HASH_PRF",
            value: prf_raw,
            reason,
        })?;

        let salt = require("HASH_SALT")?;
        if salt.is_empty() {
            return Err(ConfigError::Invalid {
                var: "HASH_SALT",
                value: salt,
                reason: "must not be empty".to_string(),
            });
        }

        let iterations_raw = env_or("HASH_ITERATIONS", "100000");
        let iterations = iterations_raw
            .parse::<u32>()
            .map_err(|e| e.to_string())
            .and_then(|n| {
                if n == 0 {
                    Err("must be at least 1".to_string())
                } else {
                    Ok(n)
                }
            })
            .map_err(|reason| ConfigError::Invalid {
                var: "HASH_ITERATIONS",
                value: iterations_raw,
                reason,
            })?;

        let secret = require("JWT_SECRET")?;

        let algorithm_raw = env_or("JWT_ALGORITHM", "HS256");
        let algorithm = Algorithm::from_str(&algorithm_raw).map_err(|e| ConfigError::Invalid {
            var: "JWT_ALGORITHM",
            value: algorithm_raw.clone(),
            reason: e.to_string(),
        })?;
        // Tokens are signed with the shared secret, so only the HMAC family applies
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::Invalid {
                var: "JWT_ALGORITHM",
                value: algorithm_raw,
                reason: "only HMAC algorithms (HS256, HS384, HS512) are supported".to_string(),
            });
        }

        let access_token_minutes = parse_positive_i64("ACCESS_TOKEN_EXP_MINUTES", "15")?;
        let refresh_token_days = parse_positive_i64("REFRESH_TOKEN_EXP_DAYS", "7")?;

        let admin_username = env_or("ADMIN_USERNAME", "admin");
        let admin_password = std::env::var("ADMIN_PASSWORD").ok();

        Ok(Self {
            server: ServerConfig { host, port },
            database_url,
            hashing: HashingConfig {
                prf,
                salt,
                iterations,
            },
            jwt: JwtConfig {
                secret,
                algorithm,
                access_token_minutes,
                refresh_token_days,
            },
            admin: AdminConfig {
                username: admin_username,
                password: admin_password,
            },
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::Missing(var))
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

fn parse_positive_i64(var: &'static str, default: &str) -> Result<i64, ConfigError> {
    let raw = env_or(var, default);
    raw.parse::<i64>()
        .map_err(|e| e.to_string())
        .and_then(|n| {
            if n <= 0 {
                Err("must be positive".to_string())
            } else {
                Ok(n)
            }
        })
        .map_err(|reason| ConfigError::Invalid {
            var,
            value: raw,
            reason,
        })
}
