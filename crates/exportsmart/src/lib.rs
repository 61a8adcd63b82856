//! Export Smart - export landed-cost simulator
//!
//! Asks a hosted generation service for a structured landed-cost analysis of
//! a Brazilian export, keeps the simulations the user chooses to save, and
//! drives it all through an explicit view state.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use exportsmart::models::{ExportRequest, SimulatorConfig};
//! use exportsmart::genai::{ExportAdvisor, GenerationService};
//! use exportsmart::store::{HistoryStore, SqliteStorage};
//! use exportsmart::{Simulator, ViewState};
//! ```

pub mod controller;
pub mod view_state;

pub use exportsmart_genai as genai;
pub use exportsmart_models as models;
pub use exportsmart_store as store;

pub use controller::{ControllerError, Simulator};
pub use view_state::{FieldState, LoadingState, ProductField, ResultTab, View, ViewState};

use std::path::Path;

use anyhow::Context;
use exportsmart_genai::ExportAdvisor;
use exportsmart_models::config::SimulatorConfig;
use exportsmart_store::{HistoryStore, SqliteStorage, StoreError};
use tracing::debug;

/// Read a TOML config file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulatorConfig, anyhow::Error> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(SimulatorConfig::default());
    }

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Open the saved-simulation history described by the configuration.
pub fn open_history(config: &SimulatorConfig) -> Result<HistoryStore<SqliteStorage>, StoreError> {
    let storage = SqliteStorage::open(&config.storage.sqlite_path)?;
    Ok(HistoryStore::with_key(storage, config.storage.history_key.clone()))
}

/// Build a Simulator backed by Gemini and the SQLite history.
pub fn build_simulator(config: &SimulatorConfig) -> Result<Simulator<SqliteStorage>, anyhow::Error> {
    let advisor = ExportAdvisor::from_config(&config.generation)?;
    let history = open_history(config).context("Failed to open history storage")?;
    Ok(Simulator::new(advisor, history, config.controller.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exportsmart.toml");
        std::fs::write(&path, "[storage]\nhistory_key = \"custom\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.storage.history_key, "custom");
        assert_eq!(config.generation.model, "gemini-3-flash-preview");
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[storage\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn history_opens_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SimulatorConfig::default();
        config.storage.sqlite_path = dir.path().join("db").join("h.db").display().to_string();
        config.storage.history_key = "test_history".to_string();

        let history = open_history(&config).unwrap();
        assert_eq!(history.key(), "test_history");
        assert!(history.load_all().is_empty());
    }
}
