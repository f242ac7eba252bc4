//! Repository Pattern Implementation
//!
//! # Interview Q&A
//!
//! Q: Repository 패턴이란?
//! A: 데이터 접근 로직을 추상화하는 패턴
//!
//!    장점:
//!    - 비즈니스 로직과 데이터 접근 분리
//!    - 테스트 시 인메모리 구현으로 교체 쉬움
//!    - DB 교체 시 영향 최소화
//!
//! Q: 왜 trait이 네 개인가?
//! A: 코어가 호출하는 외부 협력자 경계가 네 개
//!
//!    - `CatalogService`: live 프로젝트 목록 (읽기 전용)
//!    - `NdaService`: NDA 레코드 (생성 + 프로젝트별 조회, 삭제 없음)
//!    - `BookmarkService`: 북마크 CRUD
//!    - `SavedSearchPersistence`: 단순 key-value (JSON 문자열)
//!
//!    구현체: `Database` (PostgreSQL), `memory::*` (인메모리), `HttpCatalog` (원격)

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::{Bookmark, NdaRecord, Project};

/// live 프로젝트 카탈로그 ("live only" 상태 필터링은 업스트림 책임)
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_live_projects(&self) -> StoreResult<Vec<Project>>;
}

/// NDA 레코드 저장소
#[async_trait]
pub trait NdaService: Send + Sync {
    async fn create(&self, record: &NdaRecord) -> StoreResult<()>;
    async fn list_by_project(&self, project_id: &str) -> StoreResult<Vec<NdaRecord>>;
}

/// 북마크 저장소
///
/// `create`는 같은 (investor, project) 쌍이 이미 있으면 `StoreError::Conflict`.
#[async_trait]
pub trait BookmarkService: Send + Sync {
    async fn create(&self, bookmark: &Bookmark) -> StoreResult<()>;
    async fn update(&self, bookmark: &Bookmark) -> StoreResult<()>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
    async fn list_by_investor(&self, investor_id: &str) -> StoreResult<Vec<Bookmark>>;
}

/// 저장된 검색용 key-value 영속화
#[async_trait]
pub trait SavedSearchPersistence: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> StoreResult<()>;
}
