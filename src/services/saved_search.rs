//! Saved Search Store
//!
//! Named `(query, FilterSpec, SortSpec)` snapshots per viewer, persisted as one JSON
//! array per owner under `saved_searches_{owner}`.
//!
//! Entries are never edited in place. Applying one hands back a copy of its
//! query state; re-saving creates a new entry.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::SavedSearchPersistence;
use crate::error::{StoreError, StoreResult};
use crate::types::{FilterSpec, QueryState, SavedSearch, SortSpec};

pub struct SavedSearchStore {
    persistence: Arc<dyn SavedSearchPersistence>,
    guest_key: String,
    /// 같은 프로세스 내 read-modify-write 직렬화
    write_lock: Mutex<()>,
}

impl SavedSearchStore {
    pub fn new(persistence: Arc<dyn SavedSearchPersistence>, guest_key: impl Into<String>) -> Self {
        Self {
            persistence,
            guest_key: guest_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// 비로그인(빈 키)이면 공용 guest 버킷
    pub fn resolve_owner(&self, owner_key: &str) -> String {
        let owner = owner_key.trim();
        if owner.is_empty() {
            self.guest_key.clone()
        } else {
            owner.to_string()
        }
    }

    pub fn storage_key(owner: &str) -> String {
        format!("saved_searches_{}", owner)
    }

    /// 저장된 검색 생성 (이름 중복 허용)
    pub async fn create(
        &self,
        owner_key: &str,
        name: &str,
        filter: FilterSpec,
        sort: SortSpec,
        query: &str,
    ) -> StoreResult<SavedSearch> {
        let owner = self.resolve_owner(owner_key);
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load(&owner).await?;
        let saved = SavedSearch {
            id: Uuid::new_v4(),
            owner_key: owner.clone(),
            name: name.trim().to_string(),
            query: query.to_string(),
            filter,
            sort,
            created_at: Utc::now(),
        };
        entries.push(saved.clone());
        self.store(&owner, &entries).await?;

        tracing::info!("Saved search {} created for {}", saved.id, owner);
        Ok(saved)
    }

    /// 생성 순서대로 반환
    ///
    /// 저장된 값이 깨져 있으면 빈 목록으로 보여주고 경고만 남김
    pub async fn list(&self, owner_key: &str) -> StoreResult<Vec<SavedSearch>> {
        let owner = self.resolve_owner(owner_key);
        match self.load(&owner).await {
            Ok(entries) => Ok(entries),
            Err(StoreError::Corrupt(msg)) => {
                tracing::warn!("Ignoring corrupt saved searches for {}: {}", owner, msg);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, owner_key: &str, id: Uuid) -> StoreResult<SavedSearch> {
        self.list(owner_key)
            .await?
            .into_iter()
            .find(|saved| saved.id == id)
            .ok_or(StoreError::NotFound)
    }

    /// 삭제. 없는 id면 false.
    pub async fn delete(&self, owner_key: &str, id: Uuid) -> StoreResult<bool> {
        let owner = self.resolve_owner(owner_key);
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load(&owner).await?;
        let before = entries.len();
        entries.retain(|saved| saved.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.store(&owner, &entries).await?;

        tracing::info!("Saved search {} deleted for {}", id, owner);
        Ok(true)
    }

    /// 저장된 검색을 활성 상태로 불러오기 (복사본)
    pub async fn load_state(&self, owner_key: &str, id: Uuid) -> StoreResult<QueryState> {
        Ok(self.get(owner_key, id).await?.to_query_state())
    }

    async fn load(&self, owner: &str) -> StoreResult<Vec<SavedSearch>> {
        match self.persistence.get(&Self::storage_key(owner)).await? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    async fn store(&self, owner: &str, entries: &[SavedSearch]) -> StoreResult<()> {
        let raw = serde_json::to_string(entries)?;
        self.persistence.set(&Self::storage_key(owner), raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryKeyValue;
    use crate::db::SavedSearchPersistence;
    use crate::types::{SortDirection, SortKey};

    fn store() -> (SavedSearchStore, Arc<MemoryKeyValue>) {
        let kv = Arc::new(MemoryKeyValue::new());
        (SavedSearchStore::new(kv.clone(), "guest"), kv)
    }

    fn kenya() -> FilterSpec {
        FilterSpec {
            countries: ["Kenya".to_string()].into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_in_creation_order_with_duplicate_names() {
        let (store, _) = store();
        let a = store.create("inv-1", "Kenya", kenya(), SortSpec::default(), "").await.unwrap();
        let b = store.create("inv-1", "Kenya", kenya(), SortSpec::default(), "solar").await.unwrap();

        let listed = store.list("inv-1").await.unwrap();
        assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(listed[1].query, "solar");
    }

    #[tokio::test]
    async fn test_owners_are_partitioned_and_blank_is_guest() {
        let (store, kv) = store();
        store.create("", "mine", FilterSpec::default(), SortSpec::default(), "").await.unwrap();

        assert!(store.list("inv-1").await.unwrap().is_empty());
        assert_eq!(store.list("  ").await.unwrap().len(), 1);
        assert_eq!(store.list("guest").await.unwrap()[0].owner_key, "guest");

        assert!(kv.get("saved_searches_guest").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _) = store();
        let keep = store.create("inv-1", "keep", kenya(), SortSpec::default(), "").await.unwrap();
        let dropped = store.create("inv-1", "drop", kenya(), SortSpec::default(), "").await.unwrap();

        assert!(store.delete("inv-1", dropped.id).await.unwrap());
        assert!(!store.delete("inv-1", dropped.id).await.unwrap());
        // 다른 owner의 id로는 삭제 불가
        assert!(!store.delete("inv-2", keep.id).await.unwrap());

        let listed = store.list("inv-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_loaded_state_is_a_template() {
        let (store, _) = store();
        let sort = SortSpec::new(SortKey::Funding, SortDirection::Desc);
        let saved = store.create("inv-1", "big rounds", kenya(), sort, "water").await.unwrap();

        let mut active = store.load_state("inv-1", saved.id).await.unwrap();
        assert_eq!(active.sort, sort);
        active.filter.sectors.insert("FinTech".to_string());
        active.query.clear();

        let stored = store.get("inv-1", saved.id).await.unwrap();
        assert!(stored.filter.sectors.is_empty());
        assert_eq!(stored.query, "water");
    }

    #[tokio::test]
    async fn test_corrupt_value_lists_empty_but_blocks_writes() {
        let (store, kv) = store();
        kv.set("saved_searches_inv-1", "{not json".to_string()).await.unwrap();

        assert!(store.list("inv-1").await.unwrap().is_empty());
        let create = store.create("inv-1", "x", FilterSpec::default(), SortSpec::default(), "").await;
        assert!(matches!(create, Err(StoreError::Corrupt(_))));
    }
}
