//! In-memory backends
//!
//! Used by tests and when no `DATABASE_URL` is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{BookmarkService, CatalogService, NdaService, SavedSearchPersistence};
use crate::error::{StoreError, StoreResult};
use crate::types::{Bookmark, NdaRecord, Project};

/// 고정 카탈로그
#[derive(Default)]
pub struct MemoryCatalog {
    projects: RwLock<Vec<Project>>,
}

impl MemoryCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: RwLock::new(projects),
        }
    }
}

#[async_trait]
impl CatalogService for MemoryCatalog {
    async fn list_live_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.projects.read().await.clone())
    }
}

#[derive(Default)]
pub struct MemoryNdaStore {
    records: RwLock<Vec<NdaRecord>>,
}

impl MemoryNdaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NdaService for MemoryNdaStore {
    async fn create(&self, record: &NdaRecord) -> StoreResult<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list_by_project(&self, project_id: &str) -> StoreResult<Vec<NdaRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| record.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryBookmarkStore {
    bookmarks: RwLock<Vec<Bookmark>>,
}

impl MemoryBookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookmarkService for MemoryBookmarkStore {
    async fn create(&self, bookmark: &Bookmark) -> StoreResult<()> {
        let mut bookmarks = self.bookmarks.write().await;
        // PostgreSQL 쪽 UNIQUE (investor_id, project_id)와 동일한 제약
        let duplicate = bookmarks.iter().any(|existing| {
            existing.investor_id == bookmark.investor_id
                && existing.project_id == bookmark.project_id
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "bookmark already exists for project {}",
                bookmark.project_id
            )));
        }
        bookmarks.push(bookmark.clone());
        Ok(())
    }

    async fn update(&self, bookmark: &Bookmark) -> StoreResult<()> {
        let mut bookmarks = self.bookmarks.write().await;
        let existing = bookmarks
            .iter_mut()
            .find(|existing| existing.id == bookmark.id)
            .ok_or(StoreError::NotFound)?;
        existing.notes = bookmark.notes.clone();
        existing.tags = bookmark.tags.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut bookmarks = self.bookmarks.write().await;
        let before = bookmarks.len();
        bookmarks.retain(|bookmark| bookmark.id != id);
        if bookmarks.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_by_investor(&self, investor_id: &str) -> StoreResult<Vec<Bookmark>> {
        let bookmarks = self.bookmarks.read().await;
        Ok(bookmarks
            .iter()
            .filter(|bookmark| bookmark.investor_id == investor_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryKeyValue {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedSearchPersistence for MemoryKeyValue {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_bookmark_store_rejects_duplicate_pair() {
        let store = MemoryBookmarkStore::new();
        assert_ok!(store.create(&Bookmark::new("inv-1", "p1", "", Vec::<String>::new())).await);

        let second = store.create(&Bookmark::new("inv-1", "p1", "", Vec::<String>::new())).await;
        assert!(matches!(second, Err(StoreError::Conflict(_))));
        assert_eq!(store.list_by_investor("inv-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bookmark_delete_unknown_is_not_found() {
        let store = MemoryBookmarkStore::new();
        assert_err!(store.delete(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_key_value_round_trip() {
        let kv = MemoryKeyValue::new();
        assert_eq!(kv.get("k").await.unwrap(), None);
        kv.set("k", "[]".to_string()).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("[]"));
    }
}
