use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Lifetime of an admin session cookie (default: `12`).
    pub admin_session_ttl_hours: i64,
    /// Add `Secure` to cookies. Enable behind HTTPS.
    pub cookie_secure: bool,
    /// Where uploaded product images are written.
    pub upload_dir: PathBuf,
    /// Served at `/static`.
    pub static_dir: PathBuf,
    /// Recipient of new-order alerts. Alerts are skipped when unset.
    pub admin_email: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `8080`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `ADMIN_SESSION_TTL_HOURS` | `12`                       |
    /// | `COOKIE_SECURE`           | `false`                    |
    /// | `UPLOAD_DIR`              | `./web/static/uploads`     |
    /// | `STATIC_DIR`              | `./web/static`             |
    /// | `ADMIN_EMAIL`             | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let admin_session_ttl_hours: i64 = std::env::var("ADMIN_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "12".into())
            .parse()
            .expect("ADMIN_SESSION_TTL_HOURS must be a valid i64");

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "./web/static/uploads".into())
            .into();
        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "./web/static".into())
            .into();

        let admin_email = std::env::var("ADMIN_EMAIL").ok().filter(|e| !e.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            admin_session_ttl_hours,
            cookie_secure,
            upload_dir,
            static_dir,
            admin_email,
        }
    }
}
