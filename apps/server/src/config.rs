//! Server configuration from environment variables.
//!
//! ## Variables
//! | Variable        | Default      | Meaning                       |
//! |-----------------|--------------|-------------------------------|
//! | `LYLAS_HOST`    | `127.0.0.1`  | Bind address                  |
//! | `LYLAS_PORT`    | `3000`       | Bind port                     |
//! | `LYLAS_DB_PATH` | `lylas.db`   | SQLite database file          |
//! | `RUST_LOG`      | `info`       | Tracing filter (read by main) |

use std::env;

/// Runtime configuration for the server process.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
}

impl Config {
    /// Loads configuration from the environment, falling back to
    /// development defaults for anything unset.
    pub fn from_env() -> Self {
        let host = env::var("LYLAS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("LYLAS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let database_path = env::var("LYLAS_DB_PATH").unwrap_or_else(|_| "lylas.db".to_string());

        Config {
            host,
            port,
            database_path,
        }
    }

    /// The address to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only checks the fallback path; env vars are not set in tests.
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: "lylas.db".to_string(),
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }
}
