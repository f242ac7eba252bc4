//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/facets` - 필터 어휘
//! - `/discovery/*` - 디스커버리 쿼리
//! - `/projects/*` - 프로젝트 상세 (NDA 게이트 적용)
//! - `/nda/*` - NDA 서명 / 상태
//! - `/saved-searches/*` - 저장된 검색
//! - `/bookmarks/*` - 북마크

pub mod bookmark;
pub mod discovery;
pub mod facets;
pub mod health;
pub mod nda;
pub mod project;
pub mod saved_search;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// `?investor_id=` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct InvestorQuery {
    pub investor_id: Option<String>,
}

impl InvestorQuery {
    /// 빈 문자열은 익명 뷰어로 취급
    pub fn viewer(&self) -> Option<&str> {
        self.investor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// 필수 식별자 검증
pub(crate) fn require_id<'a>(field: &str, value: &'a str) -> Result<&'a str, crate::ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::ApiError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed)
}

/// 라우터 생성
///
/// # Route Structure
///
/// ```text
/// GET    /health                          - 서버 상태 확인
/// GET    /facets                          - 섹터/SDG/지역/단계/모델 어휘
///
/// POST   /discovery/query                 - 필터 + 정렬 + 검색어 + 페이지
///
/// GET    /projects/:id?investor_id=       - 프로젝트 상세 (서명 시 상세 피치 포함)
///
/// POST   /nda/sign                        - NDA 서명
/// GET    /nda/:project_id/status          - 게이트 상태
///
/// GET    /saved-searches?owner_key=       - 저장된 검색 목록
/// POST   /saved-searches                  - 저장
/// DELETE /saved-searches/:id              - 삭제
/// POST   /saved-searches/:id/apply        - 저장된 검색으로 쿼리 실행
///
/// GET    /bookmarks?investor_id=          - 북마크 목록
/// POST   /bookmarks/toggle                - 생성/삭제 토글
/// PUT    /bookmarks/:id                   - 메모/태그 수정
/// DELETE /bookmarks/:id                   - 삭제
/// ```
pub fn create_router(state: AppState) -> Router {
    // CORS 설정
    // 프로덕션에서는 특정 도메인만 허용
    let cors = if state.config.is_production() {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "https://yourdomain.com".to_string());
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // 개발: localhost 허용
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5173"), // Vite dev server
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/facets", get(facets::get_facets))

        // Discovery
        .route("/discovery/query", post(discovery::run_query))
        .route("/projects/:id", get(project::get_project))

        // NDA
        .route("/nda/sign", post(nda::sign_nda))
        .route("/nda/:project_id/status", get(nda::get_status))

        // Saved searches
        .route(
            "/saved-searches",
            get(saved_search::list_saved_searches).post(saved_search::create_saved_search),
        )
        .route("/saved-searches/:id", delete(saved_search::delete_saved_search))
        .route("/saved-searches/:id/apply", post(saved_search::apply_saved_search))

        // Bookmarks
        .route("/bookmarks", get(bookmark::list_bookmarks))
        .route("/bookmarks/toggle", post(bookmark::toggle_bookmark))
        .route(
            "/bookmarks/:id",
            put(bookmark::update_bookmark).delete(bookmark::delete_bookmark),
        )

        // 미들웨어
        .layer(TraceLayer::new_for_http())
        .layer(cors)

        // 상태 주입
        .with_state(state)
}
