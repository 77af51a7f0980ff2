//! Application configuration and environment variable parsing.
//!
//! This module handles loading configuration settings from the environment (e.g., .env file).
//! It defines the `AppConfig` struct which governs behavior such as search pagination caps,
//! merge-check concurrency, and the optional static frontend directory.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Hard limit on the number of paginated search requests to make to the
    /// GitHub API per username.
    pub max_search_pages: u32,

    /// Maximum number of merge-status checks kept in flight at once.
    /// Defaults to 10 if not specified.
    #[serde(default = "default_merge_check_concurrency_limit")]
    pub merge_check_concurrency_limit: usize,

    /// Optional GitHub Personal Access Token for higher rate limits.
    pub github_token: Option<String>,

    /// Directory holding the built frontend. When set, unmatched routes fall
    /// back to serving the single-page app from this directory ("production"
    /// mode); when unset, the service only exposes the API.
    pub static_dir: Option<String>,
}

fn default_merge_check_concurrency_limit() -> usize {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_config_from_env() {
        // Set env vars
        env::set_var("MAX_SEARCH_PAGES", "5");
        env::set_var("MERGE_CHECK_CONCURRENCY_LIMIT", "4");
        env::set_var("GITHUB_TOKEN", "ghp_test");
        env::set_var("STATIC_DIR", "client/build");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.max_search_pages, 5);
        assert_eq!(config.merge_check_concurrency_limit, 4);
        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(config.static_dir.as_deref(), Some("client/build"));

        // Clean up
        env::remove_var("MAX_SEARCH_PAGES");
        env::remove_var("MERGE_CHECK_CONCURRENCY_LIMIT");
        env::remove_var("GITHUB_TOKEN");
        env::remove_var("STATIC_DIR");
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        env::set_var("MAX_SEARCH_PAGES", "10");
        env::remove_var("MERGE_CHECK_CONCURRENCY_LIMIT");
        env::remove_var("GITHUB_TOKEN");
        env::remove_var("STATIC_DIR");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.merge_check_concurrency_limit, 10);
        assert!(config.github_token.is_none());
        assert!(config.static_dir.is_none());

        env::remove_var("MAX_SEARCH_PAGES");
    }

    #[test]
    #[serial]
    fn test_config_missing_vars() {
        // Ensure the required var is missing
        env::remove_var("MAX_SEARCH_PAGES");
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }
}
