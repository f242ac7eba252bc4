//! Bookmark Store
//!
//! Investor annotations (notes + tags) per project. At most one bookmark per
//! (investor, project): `create` refuses a second one, `toggle` removes an existing
//! bookmark instead of duplicating it. Both run the existence check and the write
//! under one lock, and the PostgreSQL backend also has a UNIQUE constraint.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::BookmarkService;
use crate::error::{StoreError, StoreResult};
use crate::types::{normalize_tags, Bookmark};

/// toggle 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "bookmark", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Created(Bookmark),
    Removed(Bookmark),
}

pub struct BookmarkStore {
    service: Arc<dyn BookmarkService>,
    write_lock: Mutex<()>,
}

impl BookmarkStore {
    pub fn new(service: Arc<dyn BookmarkService>) -> Self {
        Self {
            service,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list_by_investor(&self, investor_id: &str) -> StoreResult<Vec<Bookmark>> {
        self.service.list_by_investor(investor_id).await
    }

    pub async fn find(&self, investor_id: &str, project_id: &str) -> StoreResult<Option<Bookmark>> {
        Ok(self
            .list_by_investor(investor_id)
            .await?
            .into_iter()
            .find(|bookmark| bookmark.project_id == project_id))
    }

    /// project_id → 북마크 (결과 목록 데코레이션용)
    pub async fn by_project(&self, investor_id: &str) -> StoreResult<HashMap<String, Bookmark>> {
        Ok(self
            .list_by_investor(investor_id)
            .await?
            .into_iter()
            .map(|bookmark| (bookmark.project_id.clone(), bookmark))
            .collect())
    }

    /// 북마크 생성. 이미 있으면 `Conflict`.
    pub async fn create(
        &self,
        investor_id: &str,
        project_id: &str,
        notes: &str,
        tags: &[String],
    ) -> StoreResult<Bookmark> {
        let _guard = self.write_lock.lock().await;

        if self.find(investor_id, project_id).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "project {} is already bookmarked",
                project_id
            )));
        }
        self.insert(investor_id, project_id, notes, tags).await
    }

    /// 있으면 삭제, 없으면 생성
    pub async fn toggle(
        &self,
        investor_id: &str,
        project_id: &str,
        notes: &str,
        tags: &[String],
    ) -> StoreResult<ToggleOutcome> {
        let _guard = self.write_lock.lock().await;

        match self.find(investor_id, project_id).await? {
            Some(existing) => {
                self.service.delete(existing.id).await?;
                tracing::info!("Bookmark removed: investor={} project={}", investor_id, project_id);
                Ok(ToggleOutcome::Removed(existing))
            }
            None => {
                let created = self.insert(investor_id, project_id, notes, tags).await?;
                Ok(ToggleOutcome::Created(created))
            }
        }
    }

    /// 메모/태그 수정 (소유자만)
    pub async fn update(
        &self,
        investor_id: &str,
        id: Uuid,
        notes: &str,
        tags: &[String],
    ) -> StoreResult<Bookmark> {
        let _guard = self.write_lock.lock().await;

        let mut bookmark = self.owned(investor_id, id).await?;
        bookmark.notes = notes.trim().to_string();
        bookmark.tags = normalize_tags(tags);
        self.service.update(&bookmark).await?;
        Ok(bookmark)
    }

    /// 삭제 (소유자만)
    pub async fn delete(&self, investor_id: &str, id: Uuid) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let bookmark = self.owned(investor_id, id).await?;
        self.service.delete(bookmark.id).await?;
        tracing::info!(
            "Bookmark removed: investor={} project={}",
            investor_id,
            bookmark.project_id
        );
        Ok(())
    }

    async fn owned(&self, investor_id: &str, id: Uuid) -> StoreResult<Bookmark> {
        self.list_by_investor(investor_id)
            .await?
            .into_iter()
            .find(|bookmark| bookmark.id == id)
            .ok_or(StoreError::NotFound)
    }

    async fn insert(
        &self,
        investor_id: &str,
        project_id: &str,
        notes: &str,
        tags: &[String],
    ) -> StoreResult<Bookmark> {
        let bookmark = Bookmark::new(investor_id, project_id, notes, tags);
        self.service.create(&bookmark).await?;
        tracing::info!("Bookmark created: investor={} project={}", investor_id, project_id);
        Ok(bookmark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryBookmarkStore;

    fn store() -> BookmarkStore {
        BookmarkStore::new(Arc::new(MemoryBookmarkStore::new()))
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_twice_yields_one_bookmark() {
        let store = store();
        store.create("inv-1", "p1", "", &[]).await.unwrap();

        let second = store.create("inv-1", "p1", "again", &[]).await;
        assert!(matches!(second, Err(StoreError::Conflict(_))));
        assert_eq!(store.list_by_investor("inv-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_creates_then_removes() {
        let store = store();

        let first = store.toggle("inv-1", "p1", "watch", &tags(&["agri"])).await.unwrap();
        let created = match first {
            ToggleOutcome::Created(bookmark) => bookmark,
            other => panic!("Expected Created, got {:?}", other),
        };
        assert_eq!(created.notes, "watch");

        let second = store.toggle("inv-1", "p1", "", &[]).await.unwrap();
        assert_eq!(second, ToggleOutcome::Removed(created));
        assert!(store.list_by_investor("inv-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_never_duplicate() {
        let store = Arc::new(store());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.toggle("inv-1", "p1", "", &[]).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 짝수 번 토글 → 없음
        assert!(store.list_by_investor("inv-1").await.unwrap().is_empty());
        store.toggle("inv-1", "p1", "", &[]).await.unwrap();
        assert_eq!(store.list_by_investor("inv-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_notes_and_tags() {
        let store = store();
        let bookmark = store.create("inv-1", "p1", "", &[]).await.unwrap();

        let updated = store
            .update("inv-1", bookmark.id, " follow up in Q3 ", &tags(&["climate", " ", "climate"]))
            .await
            .unwrap();
        assert_eq!(updated.notes, "follow up in Q3");
        assert_eq!(updated.tags.len(), 1);

        let stored = store.find("inv-1", "p1").await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_other_investor_cannot_touch_bookmark() {
        let store = store();
        let bookmark = store.create("inv-1", "p1", "", &[]).await.unwrap();

        assert!(matches!(
            store.delete("inv-2", bookmark.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.update("inv-2", bookmark.id, "x", &[]).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.list_by_investor("inv-1").await.unwrap().len(), 1);

        store.delete("inv-1", bookmark.id).await.unwrap();
        assert!(store.find("inv-1", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_by_project_index() {
        let store = store();
        store.create("inv-1", "p1", "", &[]).await.unwrap();
        store.create("inv-1", "p2", "", &[]).await.unwrap();
        store.create("inv-2", "p3", "", &[]).await.unwrap();

        let index = store.by_project("inv-1").await.unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains_key("p1") && index.contains_key("p2"));
    }
}
