use async_trait::async_trait;
use dashmap::DashMap;

use super::error::StoreError;
use super::traits::OptionStore;

/// In-process option store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryOptionStore {
    options: DashMap<String, String>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of options currently held.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.options.get(name).map(|v| v.value().clone()))
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.options.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.options.remove(name).is_some())
    }
}
