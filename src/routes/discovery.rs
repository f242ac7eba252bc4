//! Discovery Endpoint
//!
//! One query call for the presentation layer: catalog → filter → sort → page,
//! decorated with the viewer's NDA and bookmark state.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    services::DiscoveryResult,
    types::{FilterSpec, QueryState, SortSpec},
    AppState,
};

// ============ Request Types ============

/// 디스커버리 쿼리 요청
///
/// 모든 필드 생략 가능. 빈 요청 = 전체 카탈로그, 최신순, 첫 페이지.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscoveryRequest {
    /// 자유 검색어
    pub query: String,
    pub filter: FilterSpec,
    pub sort: SortSpec,
    /// 뷰어 (없으면 익명: NDA/북마크 표시 없음)
    pub investor_id: Option<String>,
    /// 페이지 (0부터 시작)
    pub page: Option<u32>,
    /// 페이지 크기 (기본 20, 최대 100)
    pub limit: Option<u32>,
}

impl DiscoveryRequest {
    pub fn query_state(&self) -> QueryState {
        QueryState {
            query: self.query.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
        }
    }

    pub fn viewer(&self) -> Option<&str> {
        self.investor_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

// ============ Handlers ============

/// POST /discovery/query
///
/// # Request
///
/// ```json
/// {
///   "query": "solar",
///   "filter": { "countries": ["Kenya"], "funding_range": { "min": "10,000" } },
///   "sort": { "key": "funding", "direction": "asc" },
///   "investor_id": "inv-1",
///   "page": 0,
///   "limit": 20
/// }
/// ```
///
/// 카탈로그 조회가 실패해도 에러가 아니라 `catalog_stale: true`로 응답
pub async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<DiscoveryRequest>,
) -> Json<DiscoveryResult> {
    let limit = state.config.page_size(request.limit);
    let page = request.page.unwrap_or(0);

    let result = state
        .discovery
        .query(&request.query_state(), request.viewer(), page, limit)
        .await;

    Json(result)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::routes::test_support::{app, send};

    fn ids(body: &Value) -> Vec<String> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_empty_request_returns_whole_catalog_newest_first() {
        let (status, body) = send(&app(), Method::POST, "/discovery/query", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["p1", "p2", "p3"]);
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["nothing_found"], false);
    }

    #[tokio::test]
    async fn test_funding_sort_and_country_filter() {
        let request = json!({
            "filter": { "countries": ["Kenya"] },
            "sort": { "key": "funding", "direction": "asc" }
        });
        let (_, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(ids(&body), vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_malformed_range_is_ignored() {
        let request = json!({ "filter": { "funding_range": { "min": "abc", "max": "" } } });
        let (status, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn test_unknown_sort_key_uses_default_order() {
        let request = json!({ "sort": { "key": "trending", "direction": "sideways" } });
        let (status, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_non_numeric_sdg_matches_nothing() {
        let request = json!({ "filter": { "sdgs": ["seven"] } });
        let (status, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nothing_found"], true);
    }

    #[tokio::test]
    async fn test_string_flag_filters_pilots() {
        let request = json!({ "filter": { "has_pilots": "true" } });
        let (status, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["p1"]);

        let request = json!({ "filter": { "has_pilots": "sometimes" } });
        let (_, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(body["pagination"]["total"], 3);
    }

    #[tokio::test]
    async fn test_fractional_minimum_rounds_up() {
        let request = json!({ "filter": { "funding_range": { "min": "10000.25" } } });
        let (_, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(ids(&body), vec!["p1", "p3"]);
    }

    #[tokio::test]
    async fn test_nothing_found_flag() {
        let request = json!({ "filter": { "countries": ["Peru"] } });
        let (_, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(body["nothing_found"], true);
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let request = json!({ "page": 1, "limit": 2 });
        let (_, body) = send(&app(), Method::POST, "/discovery/query", Some(request)).await;
        assert_eq!(ids(&body), vec!["p3"]);
        assert_eq!(body["pagination"]["has_next"], false);
        assert_eq!(body["pagination"]["limit"], 2);
    }

    #[tokio::test]
    async fn test_result_items_never_carry_detailed_pitch() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/nda/sign",
            Some(json!({ "investor_id": "inv-1", "project_id": "p1" })),
        )
        .await;

        let request = json!({ "investor_id": "inv-1" });
        let (_, body) = send(&app, Method::POST, "/discovery/query", Some(request)).await;
        let first = &body["items"][0];
        assert_eq!(first["id"], "p1");
        assert_eq!(first["nda_signed"], true);
        assert_eq!(first["has_detailed_pitch"], true);
        assert!(first.get("detailed_pitch").is_none());
        assert_eq!(body["items"][1]["nda_signed"], false);
    }
}
