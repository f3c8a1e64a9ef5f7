//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub signature: SignatureConfig,

    #[serde(default)]
    pub todos: TodosConfig,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; auth lives under `/auth`, todos under `/todos`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the session is persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./.todo-client/session.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Signature pad dimensions and pen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_width() -> u32 {
    400
}

fn default_height() -> u32 {
    200
}

fn default_stroke_width() -> f64 {
    2.0
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            stroke_width: default_stroke_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodosConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory PDF downloads are written to
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_page_size() -> u32 {
    10
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for TodosConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            download_dir: default_download_dir(),
        }
    }
}
