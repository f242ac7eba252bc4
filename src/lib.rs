//! Venture Discovery API Library
//!
//! # Overview
//!
//! 투자자가 프로젝트 카탈로그를 탐색하고, NDA 서명 후에만 상세 피치를
//! 볼 수 있도록 하는 백엔드 API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!        ┌────────────────────────────────────────┐
//!        │ Catalog service / PostgreSQL / memory  │
//!        └────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (필터/정렬, 저장된 검색, NDA 게이트, 북마크)
//! - `db`: 저장소 trait 및 PostgreSQL / 인메모리 구현
//! - `types`: 공통 타입 정의
//!
//! ## Usage
//!
//! ```rust,ignore
//! use venture_discovery_api::{AppState, Config, routes};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let state = AppState::in_memory(Config::from_env()?, vec![]);
//!     let app = routes::create_router(state);
//!     // ... 서버 시작
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod db;
pub mod types;

// Re-exports for convenience
pub use config::{Config, Environment};
pub use error::{ApiError, StoreError};
pub use db::Database;
pub use services::{
    BookmarkStore, ConfidentialityGate, DiscoveryEngine, DiscoverySession, SavedSearchStore,
};

use db::memory::{MemoryBookmarkStore, MemoryCatalog, MemoryKeyValue, MemoryNdaStore};
use db::{BookmarkService, CatalogService, NdaService, SavedSearchPersistence};
use types::Project;

/// 애플리케이션 전역 상태
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL (없으면 인메모리 모드)
    pub db: Option<Arc<Database>>,
    pub discovery: Arc<DiscoveryEngine>,
    pub gate: Arc<ConfidentialityGate>,
    pub bookmarks: Arc<BookmarkStore>,
    pub saved_searches: Arc<SavedSearchStore>,
    pub config: Arc<Config>,
}

/// 서비스들이 사용할 백엔드 묶음
pub struct Backends {
    pub catalog: Arc<dyn CatalogService>,
    pub ndas: Arc<dyn NdaService>,
    pub bookmarks: Arc<dyn BookmarkService>,
    pub saved_searches: Arc<dyn SavedSearchPersistence>,
}

impl Backends {
    /// 전부 인메모리
    pub fn in_memory(catalog: Vec<Project>) -> Self {
        Self {
            catalog: Arc::new(MemoryCatalog::new(catalog)),
            ndas: Arc::new(MemoryNdaStore::new()),
            bookmarks: Arc::new(MemoryBookmarkStore::new()),
            saved_searches: Arc::new(MemoryKeyValue::new()),
        }
    }

    /// 전부 PostgreSQL
    pub fn postgres(db: Arc<Database>) -> Self {
        Self {
            catalog: db.clone(),
            ndas: db.clone(),
            bookmarks: db.clone(),
            saved_searches: db,
        }
    }
}

impl AppState {
    pub fn new(config: Config, db: Option<Arc<Database>>, backends: Backends) -> Self {
        let gate = Arc::new(ConfidentialityGate::new(backends.ndas));
        let bookmarks = Arc::new(BookmarkStore::new(backends.bookmarks));
        let discovery = Arc::new(DiscoveryEngine::new(
            backends.catalog,
            gate.clone(),
            bookmarks.clone(),
        ));
        let saved_searches = Arc::new(SavedSearchStore::new(
            backends.saved_searches,
            config.guest_owner_key.clone(),
        ));

        Self {
            db,
            discovery,
            gate,
            bookmarks,
            saved_searches,
            config: Arc::new(config),
        }
    }

    /// 인메모리 상태 (테스트 / DB 없는 로컬 실행)
    pub fn in_memory(config: Config, catalog: Vec<Project>) -> Self {
        Self::new(config, None, Backends::in_memory(catalog))
    }
}
