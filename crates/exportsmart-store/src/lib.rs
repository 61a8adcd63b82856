pub mod error;
pub mod history;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use error::StoreError;
pub use history::HistoryStore;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use storage::LocalStorage;
