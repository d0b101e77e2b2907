use async_trait::async_trait;

use super::error::StoreError;

/// Flat string-valued option storage.
///
/// Names passed here are already fully qualified; namespacing is applied by
/// [`RecordStore`](crate::records::RecordStore).
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read an option, `None` if it was never written or has been deleted.
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite an option.
    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Delete an option.
    ///
    /// Returns `true` if the option was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StoreError>;
}
