use crate::error::StoreError;

/// String-keyed slots holding string values, the same contract as browser local storage.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Inserts or replaces the value at `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: LocalStorage + ?Sized> LocalStorage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}
