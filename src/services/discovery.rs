//! Discovery Controller
//!
//! # Flow
//!
//! ```text
//! CatalogService ──▶ filter::apply ──▶ sort ──▶ page ──▶ decorate (NDA / bookmark)
//! ```
//!
//! Decoration never changes which projects are in the result, only the metadata
//! attached to each item.
//!
//! `DiscoveryEngine` is stateless per request and shared by every viewer.
//! `DiscoverySession` owns one viewer's active `QueryState` and discards responses
//! from superseded queries.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::CatalogService;
use crate::types::{Bookmark, Page, Pagination, Project, PublicProject, QueryState};

use super::{filter, sort, BookmarkStore, ConfidentialityGate};

/// 결과 항목 (공개 티어 + 뷰어별 메타데이터)
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryItem {
    #[serde(flatten)]
    pub project: PublicProject,
    pub nda_signed: bool,
    pub bookmark: Option<Bookmark>,
}

/// 디스커버리 응답
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub items: Vec<DiscoveryItem>,
    pub pagination: Pagination,
    /// 결과 없음 안내 표시용
    pub nothing_found: bool,
    /// 카탈로그 조회 실패로 마지막 스냅샷(또는 빈 목록)을 썼는지
    pub catalog_stale: bool,
}

/// 카탈로그 스냅샷
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub projects: Arc<Vec<Project>>,
    pub stale: bool,
}

pub struct DiscoveryEngine {
    catalog: Arc<dyn CatalogService>,
    gate: Arc<ConfidentialityGate>,
    bookmarks: Arc<BookmarkStore>,
    /// 발행 순서. 늦게 도착한 옛 응답이 더 새 스냅샷을 덮어쓰지 못하게 함
    fetch_seq: AtomicU64,
    last_known: RwLock<Option<(u64, Arc<Vec<Project>>)>>,
}

impl DiscoveryEngine {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        gate: Arc<ConfidentialityGate>,
        bookmarks: Arc<BookmarkStore>,
    ) -> Self {
        Self {
            catalog,
            gate,
            bookmarks,
            fetch_seq: AtomicU64::new(0),
            last_known: RwLock::new(None),
        }
    }

    /// 카탈로그 조회
    ///
    /// 실패 시 마지막으로 성공한 스냅샷, 첫 로드라면 빈 목록.
    /// 캐시는 더 나중에 발행된 조회의 응답으로만 교체됨.
    pub async fn fetch_catalog(&self) -> CatalogSnapshot {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        match self.catalog.list_live_projects().await {
            Ok(projects) => {
                let projects = Arc::new(projects);
                let mut last_known = self.last_known.write().await;
                let newer_cached =
                    matches!(last_known.as_ref(), Some((cached_seq, _)) if *cached_seq > seq);
                if newer_cached {
                    tracing::debug!("Not caching out-of-order catalog response (fetch {})", seq);
                } else {
                    *last_known = Some((seq, projects.clone()));
                }
                CatalogSnapshot {
                    projects,
                    stale: false,
                }
            }
            Err(err) => {
                tracing::warn!("Catalog fetch failed, using last known state: {}", err);
                let projects = self
                    .last_known
                    .read()
                    .await
                    .as_ref()
                    .map(|(_, projects)| projects.clone())
                    .unwrap_or_default();
                CatalogSnapshot {
                    projects,
                    stale: true,
                }
            }
        }
    }

    /// 필터 → 정렬 (순수 함수)
    pub fn rank(catalog: &[Project], state: &QueryState) -> Vec<Project> {
        let mut ranked = filter::apply(catalog, &state.filter, &state.query);
        sort::sort_in_place(&mut ranked, state.sort);
        ranked
    }

    /// 한 번의 디스커버리 쿼리
    pub async fn query(
        &self,
        state: &QueryState,
        viewer: Option<&str>,
        page: u32,
        limit: u32,
    ) -> DiscoveryResult {
        let snapshot = self.fetch_catalog().await;
        let ranked = Self::rank(&snapshot.projects, state);
        tracing::debug!(
            "Discovery query: catalog={} matched={} sort={:?}",
            snapshot.projects.len(),
            ranked.len(),
            state.sort
        );

        let Page { items, pagination } = Page::slice(ranked, page, limit);
        let items = self.decorate(viewer, items).await;

        DiscoveryResult {
            nothing_found: pagination.total == 0,
            items,
            pagination,
            catalog_stale: snapshot.stale,
        }
    }

    /// 카탈로그에서 프로젝트 하나 찾기
    pub async fn find_project(&self, project_id: &str) -> Option<Project> {
        self.fetch_catalog()
            .await
            .projects
            .iter()
            .find(|project| project.id == project_id)
            .cloned()
    }

    /// 뷰어 메타데이터 부착. 조회 실패는 "표시 없음"으로 처리.
    async fn decorate(&self, viewer: Option<&str>, projects: Vec<Project>) -> Vec<DiscoveryItem> {
        let (signed, mut bookmarks) = match viewer {
            Some(investor_id) => {
                let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
                let signed = self
                    .gate
                    .signed_projects(investor_id, &ids)
                    .await
                    .unwrap_or_else(|err| {
                        tracing::warn!("NDA lookup failed during discovery: {}", err);
                        HashSet::new()
                    });
                let bookmarks = self.bookmarks.by_project(investor_id).await.unwrap_or_else(|err| {
                    tracing::warn!("Bookmark lookup failed during discovery: {}", err);
                    HashMap::new()
                });
                (signed, bookmarks)
            }
            None => (HashSet::new(), HashMap::new()),
        };

        projects
            .iter()
            .map(|project| DiscoveryItem {
                project: PublicProject::from(project),
                nda_signed: signed.contains(&project.id),
                bookmark: bookmarks.remove(&project.id),
            })
            .collect()
    }
}

/// 한 뷰어의 디스커버리 세션
pub struct DiscoverySession {
    engine: Arc<DiscoveryEngine>,
    viewer: Option<String>,
    generation: AtomicU64,
    state: RwLock<QueryState>,
    latest: RwLock<Option<DiscoveryResult>>,
}

impl DiscoverySession {
    pub fn new(engine: Arc<DiscoveryEngine>, viewer: Option<String>) -> Self {
        Self {
            engine,
            viewer,
            generation: AtomicU64::new(0),
            state: RwLock::new(QueryState::default()),
            latest: RwLock::new(None),
        }
    }

    /// 현재 활성 검색 상태 (복사본)
    pub async fn state(&self) -> QueryState {
        self.state.read().await.clone()
    }

    /// 마지막으로 적용된 결과
    pub async fn latest(&self) -> Option<DiscoveryResult> {
        self.latest.read().await.clone()
    }

    /// 새 검색 상태 제출
    ///
    /// 상태는 통째로 교체. 응답이 오기 전에 다른 쿼리가 제출됐다면
    /// 이 응답은 버리고 `None`.
    pub async fn submit(&self, next: QueryState, page: u32, limit: u32) -> Option<DiscoveryResult> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().await = next.clone();

        let result = self
            .engine
            .query(&next, self.viewer.as_deref(), page, limit)
            .await;

        let mut latest = self.latest.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding stale discovery response (generation {})", generation);
            return None;
        }
        *latest = Some(result.clone());
        Some(result)
    }
}
