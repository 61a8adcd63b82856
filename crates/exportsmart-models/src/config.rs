use serde::{Deserialize, Serialize};

use crate::storage_schema::HISTORY_STORAGE_KEY;

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Where saved simulations live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Path to the SQLite file backing local storage.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    /// Storage slot for the simulation history.
    #[serde(default = "default_history_key")]
    pub history_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_sqlite_path(),
            history_key: default_history_key(),
        }
    }
}

/// Settings for the hosted generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key. `API_KEY` is tried when this one is unset.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_identification_temperature")]
    pub identification_temperature: f32,
    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            identification_temperature: default_identification_temperature(),
            analysis_temperature: default_analysis_temperature(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerConfig {
    /// Overwrite the chosen transport mode with the one suggested by product identification.
    #[serde(default = "default_true")]
    pub apply_suggested_transport: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            apply_suggested_transport: true,
        }
    }
}

/// Fallback environment variable for the service credential.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

fn default_sqlite_path() -> String {
    "data/exportsmart.db".to_string()
}
fn default_history_key() -> String {
    HISTORY_STORAGE_KEY.to_string()
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_identification_temperature() -> f32 {
    0.1
}
fn default_analysis_temperature() -> f32 {
    0.2
}
fn default_true() -> bool {
    true
}
