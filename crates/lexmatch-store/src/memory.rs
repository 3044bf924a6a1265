//! Fixed in-memory advocate pool.

use std::path::Path;

use async_trait::async_trait;
use lexmatch_core::Advocate;
use tracing::info;

use crate::{AdvocateStore, NamePattern, StoreError};

/// An advocate pool held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    advocates: Vec<Advocate>,
}

impl MemoryStore {
    pub fn new(advocates: Vec<Advocate>) -> Self {
        Self { advocates }
    }

    /// Load a pool from a JSON array of advocate documents.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let advocates: Vec<Advocate> = serde_json::from_slice(&bytes)?;
        info!(count = advocates.len(), path = %path.display(), "loaded in-memory advocate pool");
        Ok(Self::new(advocates))
    }

    pub fn len(&self) -> usize {
        self.advocates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advocates.is_empty()
    }
}

#[async_trait]
impl AdvocateStore for MemoryStore {
    async fn advocates(&self) -> Result<Vec<Advocate>, StoreError> {
        Ok(self.advocates.clone())
    }

    async fn find_first(&self, pattern: &NamePattern) -> Result<Option<Advocate>, StoreError> {
        Ok(self
            .advocates
            .iter()
            .find(|a| pattern.is_match(&a.name))
            .cloned())
    }
}
