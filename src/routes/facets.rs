//! Facet Vocabulary Endpoint

use axum::Json;

use crate::services::FacetVocabulary;

/// GET /facets
///
/// 필터 UI가 열거할 섹터 / SDG / 지역 / 투자 단계 / 투자 모델 목록
pub async fn get_facets() -> Json<FacetVocabulary> {
    Json(FacetVocabulary::load())
}
