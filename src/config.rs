use std::fmt;
use std::time::Duration;

use crate::error::{BootstrapError, Result};

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "walmart";
pub const DEFAULT_APP_USER: &str = "wm_mega_user";
pub const DEFAULT_APP_PASSWORD: &str = "wm_mega";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// Credentials of the application user created by the bootstrap.
#[derive(Clone)]
pub struct AppUser {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AppUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_db_name: String,
    pub app_user: AppUser,
    pub server_selection_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_secs = match lookup("MONGO_SERVER_SELECTION_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| BootstrapError::Config {
                key: "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
                message: format!("{:?} is not a number of seconds: {}", raw, e),
            })?,
            None => DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        };

        Ok(Self {
            mongo_uri: var("MONGO_URI", DEFAULT_MONGO_URI),
            mongo_db_name: var("MONGO_DB_NAME", DEFAULT_DB_NAME),
            app_user: AppUser {
                username: var("MONGO_APP_USER", DEFAULT_APP_USER),
                password: var("MONGO_APP_PASSWORD", DEFAULT_APP_PASSWORD),
            },
            server_selection_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_walmart_deployment() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db_name, "walmart");
        assert_eq!(config.app_user.username, "wm_mega_user");
        assert_eq!(config.app_user.password, "wm_mega");
        assert_eq!(config.server_selection_timeout, Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGO_URI", "mongodb://db:27017"),
            ("MONGO_DB_NAME", "staging"),
            ("MONGO_APP_USER", "scraper"),
            ("MONGO_APP_PASSWORD", "s3cret"),
            ("MONGO_SERVER_SELECTION_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.mongo_db_name, "staging");
        assert_eq!(config.app_user.username, "scraper");
        assert_eq!(config.app_user.password, "s3cret");
        assert_eq!(config.server_selection_timeout, Duration::from_secs(5));
    }

    #[test]
    fn malformed_timeout_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[(
            "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
            "soon",
        )]))
        .unwrap_err();

        match err {
            BootstrapError::Config { key, .. } => {
                assert_eq!(key, "MONGO_SERVER_SELECTION_TIMEOUT_SECS")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn debug_output_hides_the_password() {
        let config = Config::from_lookup(lookup_from(&[("MONGO_APP_PASSWORD", "hunter2")])).unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("wm_mega_user"));
        assert!(!rendered.contains("hunter2"));
    }
}
