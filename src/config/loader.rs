//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "todoclient.toml";

/// Load configuration from todoclient.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_config_or_default() -> Result<Config> {
    match load_config() {
        Err(Error::ConfigNotFound) => Ok(Config::default()),
        other => other,
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Todo client configuration

[api]
base_url = "${TODO_API_URL:-http://localhost:8080/api}"
timeout_secs = 30

[storage]
# Session token, user and expiry are kept here between runs
path = "./.todo-client/session.json"

[signature]
width = 400
height = 200
stroke_width = 2.0

[todos]
page_size = 10
download_dir = "."
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_env_interpolation() {
        env::set_var("TODO_CLIENT_TEST_VAR", "hello");
        let content = "value = \"${TODO_CLIENT_TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("TODO_CLIENT_TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_content_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, default_config_content()).unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.signature.width, 400);
        assert_eq!(config.todos.page_size, 10);
        assert!(config.api.base_url.starts_with("http"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://example.test/api\"").unwrap();
        assert_eq!(config.api.base_url, "http://example.test/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.signature.stroke_width, 2.0);
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let result = load_config_from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound)));
    }
}
