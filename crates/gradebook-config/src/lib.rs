//! # Gradebook Config
//!
//! Configuration types for the Gradebook API, loaded from environment
//! variables (a `.env` file is read by the binaries through `dotenvy`).
//!
//! - [`server`]: bind address of the HTTP server
//! - [`database`]: PostgreSQL connection settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! # Example
//!
//! ```ignore
//! use gradebook_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let database = DatabaseConfig::from_env();
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when it is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses boolean flags the way operators usually write them.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"),
        Err(_) => default,
    }
}
