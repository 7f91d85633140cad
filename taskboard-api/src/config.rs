/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `SESSION_JWT_SECRET`: Secret for session token validation (required)
/// - `CLERK_SECRET_KEY`: Clerk backend API key (required)
/// - `CLERK_WEBHOOK_SECRET`: Webhook endpoint secret; when absent, webhook
///   deliveries are accepted WITHOUT verification (local development only)
/// - `FREE_TIER_LIMIT`: Member limit for free-tier organizations (default: 2)
/// - `PRO_TIER_SLUG`: Plan slug that grants unlimited members
///   (default: pro_tier)
/// - `FRONTEND_ORIGIN`: Allowed CORS origin (default: http://localhost:3000)
/// - `RUST_LOG`: Log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Clerk (identity provider) configuration
    pub clerk: ClerkConfig,

    /// Subscription tier configuration
    pub billing: BillingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed frontend origin for CORS
    pub frontend_origin: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret for session token validation
    ///
    /// Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub session_jwt_secret: String,
}

/// Clerk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClerkConfig {
    /// Backend API secret key
    pub secret_key: String,

    /// Webhook endpoint secret; `None` selects the unverified (Trusting)
    /// ingress mode, which must only ever be used in local development
    pub webhook_secret: Option<String>,
}

/// Subscription tier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Member limit for organizations on the free tier
    pub free_tier_limit: i64,

    /// Plan slug that grants unlimited members
    pub pro_tier_slug: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or have invalid
    /// values.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()?;
        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let session_jwt_secret = env::var("SESSION_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_JWT_SECRET environment variable is required"))?;
        if session_jwt_secret.len() < 32 {
            anyhow::bail!("SESSION_JWT_SECRET must be at least 32 characters long");
        }

        let clerk_secret_key = env::var("CLERK_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("CLERK_SECRET_KEY environment variable is required"))?;
        let clerk_webhook_secret = env::var("CLERK_WEBHOOK_SECRET").ok();

        let free_tier_limit = env::var("FREE_TIER_LIMIT")
            .unwrap_or_else(|_| "2".to_string())
            .parse::<i64>()?;
        let pro_tier_slug =
            env::var("PRO_TIER_SLUG").unwrap_or_else(|_| "pro_tier".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                frontend_origin,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth: AuthConfig { session_jwt_secret },
            clerk: ClerkConfig {
                secret_key: clerk_secret_key,
                webhook_secret: clerk_webhook_secret,
            },
            billing: BillingConfig {
                free_tier_limit,
                pro_tier_slug,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                frontend_origin: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            clerk: ClerkConfig {
                secret_key: "sk_test".to_string(),
                webhook_secret: None,
            },
            billing: BillingConfig {
                free_tier_limit: 2,
                pro_tier_slug: "pro_tier".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }
}
