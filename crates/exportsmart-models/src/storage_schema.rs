/// Storage slot holding the JSON array of saved simulations, newest first.
pub const HISTORY_STORAGE_KEY: &str = "export_smart_history";

/// Key-value table backing the local storage slots.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS local_storage (
///     key         TEXT PRIMARY KEY,
///     value       TEXT NOT NULL,
///     updated_at  TEXT NOT NULL
/// );
/// ```
pub const LOCAL_STORAGE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS local_storage (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";

/// A raw storage row as read from SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRow {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
