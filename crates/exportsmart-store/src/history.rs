use exportsmart_models::analysis::AnalysisResult;
use exportsmart_models::export_request::ExportRequest;
use exportsmart_models::simulation::SavedSimulation;
use exportsmart_models::storage_schema::HISTORY_STORAGE_KEY;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::storage::LocalStorage;

/// Saved simulations kept as one JSON array in a single storage slot, newest first.
///
/// Every write reads the whole list, modifies it in memory and rewrites the slot.
/// Two writers on the same slot can overwrite each other's changes.
pub struct HistoryStore<S: LocalStorage> {
    storage: S,
    key: String,
}

impl<S: LocalStorage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, HISTORY_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Record a new simulation at the front of the history and return it.
    pub fn save(
        &self,
        form_data: &ExportRequest,
        result: &AnalysisResult,
    ) -> Result<SavedSimulation, StoreError> {
        let saved = SavedSimulation::new(form_data.clone(), result.clone());

        let mut history = self.read_all()?;
        history.insert(0, saved.clone());
        self.write_all(&history)?;

        info!(id = %saved.id, destination = %saved.form_data.destination, total = history.len(), "Simulation saved");
        Ok(saved)
    }

    /// Every saved simulation, newest first.
    ///
    /// A missing slot, unreadable storage, or corrupt JSON all yield an empty history.
    pub fn load_all(&self) -> Vec<SavedSimulation> {
        self.read_all().unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Failed to read history slot");
            Vec::new()
        })
    }

    /// A copy of one saved simulation.
    pub fn get(&self, id: Uuid) -> Option<SavedSimulation> {
        self.load_all().into_iter().find(|sim| sim.id == id)
    }

    /// Remove every simulation with `id` and return the remaining history.
    pub fn delete_by_id(&self, id: Uuid) -> Result<Vec<SavedSimulation>, StoreError> {
        let mut history = self.read_all()?;
        let before = history.len();
        history.retain(|sim| sim.id != id);
        self.write_all(&history)?;

        debug!(%id, removed = before - history.len(), "Deleted simulation");
        Ok(history)
    }

    /// Drop the whole history slot.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(&self.key)
    }

    /// Backend failures propagate so writers never rewrite the slot from a bad read.
    /// Corrupt JSON still reads as empty.
    fn read_all(&self) -> Result<Vec<SavedSimulation>, StoreError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                error!(key = %self.key, error = %e, "Error parsing history");
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, history: &[SavedSimulation]) -> Result<(), StoreError> {
        let json = serde_json::to_string(history)?;
        self.storage.set_item(&self.key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::sqlite::SqliteStorage;
    use exportsmart_models::analysis::{CostItem, HistoricalDataPoint};
    use rust_decimal_macros::dec;

    fn request(destination: &str) -> ExportRequest {
        ExportRequest {
            destination: destination.to_string(),
            product_description: "Cotton T-shirts".to_string(),
            hs_code: "6109.10.00".to_string(),
            fob_value: dec!(10000),
            ..Default::default()
        }
    }

    fn result(summary: &str) -> AnalysisResult {
        AnalysisResult {
            executive_summary: summary.to_string(),
            fiscal_analysis: "fiscal".to_string(),
            cost_table: vec![CostItem {
                item: "FOB".to_string(),
                value: "US$ 10,000.00".to_string(),
                raw_value: dec!(10000),
                note: None,
            }],
            final_landed_cost: "US$ 12,000.00".to_string(),
            strategies: "strategies".to_string(),
            historical_data: vec![HistoricalDataPoint {
                month: "JAN/24".to_string(),
                average_fob_value: dec!(4.2),
            }],
        }
    }

    fn sqlite_store() -> HistoryStore<SqliteStorage> {
        HistoryStore::new(SqliteStorage::open_in_memory().unwrap())
    }

    #[test]
    fn empty_when_slot_missing() {
        let store = sqlite_store();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn save_prepends_and_returns_record() {
        let store = sqlite_store();
        let before = store.load_all().len();

        let saved = store.save(&request("Argentina"), &result("first")).unwrap();
        let history = store.load_all();

        assert_eq!(history.len(), before + 1);
        assert_eq!(history[0], saved);
        assert_eq!(saved.form_data.destination, "Argentina");
    }

    #[test]
    fn newest_first() {
        let store = sqlite_store();
        let first = store.save(&request("Chile"), &result("first")).unwrap();
        let second = store.save(&request("Peru"), &result("second")).unwrap();

        let history = store.load_all();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn delete_removes_only_matching_id_and_keeps_order() {
        let store = sqlite_store();
        let a = store.save(&request("Chile"), &result("a")).unwrap();
        let b = store.save(&request("Peru"), &result("b")).unwrap();
        let c = store.save(&request("India"), &result("c")).unwrap();

        let remaining = store.delete_by_id(b.id).unwrap();
        assert_eq!(remaining, vec![c.clone(), a.clone()]);
        assert_eq!(store.load_all(), vec![c, a]);
        assert!(store.get(b.id).is_none());
    }

    #[test]
    fn delete_unknown_id_leaves_history_intact() {
        let store = sqlite_store();
        let a = store.save(&request("Chile"), &result("a")).unwrap();

        let remaining = store.delete_by_id(Uuid::new_v4()).unwrap();
        assert_eq!(remaining, vec![a]);
    }

    #[test]
    fn corrupt_slot_reads_as_empty() {
        let storage = MemoryStorage::new();
        storage
            .set_item(HISTORY_STORAGE_KEY, "{not valid json")
            .unwrap();
        let store = HistoryStore::new(storage);

        assert!(store.load_all().is_empty());
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn save_over_corrupt_slot_starts_fresh() {
        let storage = MemoryStorage::new();
        storage.set_item(HISTORY_STORAGE_KEY, "[{\"id\": 1}]").unwrap();
        let store = HistoryStore::new(storage);

        let saved = store.save(&request("Egypt"), &result("fresh")).unwrap();
        assert_eq!(store.load_all(), vec![saved]);
    }

    #[test]
    fn get_returns_copy() {
        let store = sqlite_store();
        let saved = store.save(&request("Israel"), &result("x")).unwrap();

        let mut copy = store.get(saved.id).unwrap();
        copy.form_data.destination = "Changed".to_string();
        assert_eq!(store.get(saved.id).unwrap().form_data.destination, "Israel");
    }

    #[test]
    fn clear_removes_slot() {
        let store = HistoryStore::new(MemoryStorage::new());
        store.save(&request("Bolivia"), &result("x")).unwrap();
        store.clear().unwrap();

        assert!(store.load_all().is_empty());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn custom_key_isolated_from_default() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::with_key(storage, "other_history");
        store.save(&request("Mexico"), &result("x")).unwrap();

        assert_eq!(store.key(), "other_history");
        assert!(store
            .storage()
            .get_item(HISTORY_STORAGE_KEY)
            .unwrap()
            .is_none());
    }

    #[test]
    fn boxed_backend() {
        let storage: Box<dyn LocalStorage> = Box::new(MemoryStorage::new());
        let store = HistoryStore::new(storage);
        let saved = store.save(&request("Ecuador"), &result("x")).unwrap();
        assert_eq!(store.get(saved.id), Some(saved));
    }

    /// Fails reads while `failing` is set; writes go through.
    struct FailingReads {
        inner: MemoryStorage,
        failing: std::sync::atomic::AtomicBool,
    }

    impl FailingReads {
        fn set_failing(&self, failing: bool) {
            self.failing
                .store(failing, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl LocalStorage for FailingReads {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StoreError::Unavailable("read failed".into()));
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn read_error_does_not_overwrite_history() {
        let store = HistoryStore::new(FailingReads {
            inner: MemoryStorage::new(),
            failing: Default::default(),
        });
        for destination in ["Chile", "Peru", "India"] {
            store.save(&request(destination), &result("x")).unwrap();
        }

        store.storage().set_failing(true);
        assert!(store.load_all().is_empty());
        let saved = store.save(&request("Egypt"), &result("x"));
        assert!(matches!(saved, Err(StoreError::Unavailable(_))));
        let slot_before = store.storage().inner.get_item(HISTORY_STORAGE_KEY).unwrap();
        assert!(store.delete_by_id(Uuid::new_v4()).is_err());

        store.storage().set_failing(false);
        assert_eq!(store.load_all().len(), 3);
        assert_eq!(
            store.storage().inner.get_item(HISTORY_STORAGE_KEY).unwrap(),
            slot_before
        );
    }

    #[test]
    fn stored_json_uses_browser_shape() {
        let store = HistoryStore::new(MemoryStorage::new());
        store.save(&request("Uruguay"), &result("x")).unwrap();

        let raw = store.storage().get_item(HISTORY_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        assert!(first["timestamp"].is_i64());
        assert_eq!(first["formData"]["hsCode"], "6109.10.00");
        assert!(first["result"]["costTable"].is_array());
    }
}
