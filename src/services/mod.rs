//! Services Module
//!
//! 비즈니스 로직을 담당하는 서비스 레이어
//!
//! # Services
//! - `filter` / `sort`: 순수 함수 엔진
//! - `DiscoveryEngine`, `DiscoverySession`: 카탈로그 → 필터 → 정렬 → 데코레이션
//! - `SavedSearchStore`: 저장된 검색 (key-value 영속화)
//! - `ConfidentialityGate`: NDA 상태 머신 / 상세 티어 접근 제어
//! - `BookmarkStore`: 북마크 (투자자 메모/태그)
//! - `HttpCatalog`: 원격 카탈로그 클라이언트
//! - `vocabulary`: 패싯 어휘 (섹터, SDG, 지역)

pub mod filter;
pub mod sort;
pub mod vocabulary;
mod bookmark;
mod catalog;
mod discovery;
mod gate;
mod saved_search;

#[cfg(test)]
pub(crate) mod test_support;

pub use bookmark::{BookmarkStore, ToggleOutcome};
pub use catalog::HttpCatalog;
pub use discovery::{CatalogSnapshot, DiscoveryEngine, DiscoveryItem, DiscoveryResult, DiscoverySession};
pub use gate::{ConfidentialityGate, DetailedAccess, GateState};
pub use saved_search::SavedSearchStore;
pub use vocabulary::FacetVocabulary;
