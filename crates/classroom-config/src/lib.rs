//! # Classroom Config
//!
//! Configuration types for the Classroom API, loaded from environment
//! variables (a `.env` file is read by the binaries before these run).
//!
//! - [`server`]: bind address and request timeout
//! - [`database`]: PostgreSQL connection settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//!
//! # Example
//!
//! ```ignore
//! use classroom_config::{CorsConfig, DatabaseConfig, ServerConfig};
//!
//! let server = ServerConfig::from_env();
//! let database = DatabaseConfig::from_env()?;
//! let cors = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod server;

pub use cors::CorsConfig;
pub use database::{ConfigError, DatabaseConfig};
pub use server::ServerConfig;

/// Parses `key` from `lookup`, falling back to `default` when the variable
/// is unset or unparsable.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
