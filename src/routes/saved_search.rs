//! Saved Search Endpoints
//!
//! 소유자 키가 없거나 비어 있으면 공용 guest 버킷.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    services::DiscoveryResult,
    types::{FilterSpec, QueryState, SavedSearch, SortSpec},
    AppState,
};

// ============ Request/Response Types ============

#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    #[serde(default)]
    pub owner_key: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSavedSearchRequest {
    #[serde(default)]
    pub owner_key: String,
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filter: FilterSpec,
    #[serde(default)]
    pub sort: SortSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplyRequest {
    pub owner_key: String,
    pub investor_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// 저장된 검색 적용 결과: 불러온 검색 상태 + 그 상태로 실행한 결과
#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub state: QueryState,
    pub result: DiscoveryResult,
}

// ============ Handlers ============

/// GET /saved-searches?owner_key=
pub async fn list_saved_searches(
    State(state): State<AppState>,
    Query(params): Query<OwnerQuery>,
) -> Result<Json<Vec<SavedSearch>>, ApiError> {
    Ok(Json(state.saved_searches.list(&params.owner_key).await?))
}

/// POST /saved-searches
pub async fn create_saved_search(
    State(state): State<AppState>,
    Json(request): Json<CreateSavedSearchRequest>,
) -> Result<(StatusCode, Json<SavedSearch>), ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::ValidationError("name is required".to_string()));
    }

    let saved = state
        .saved_searches
        .create(
            &request.owner_key,
            &request.name,
            request.filter,
            request.sort,
            &request.query,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /saved-searches/:id?owner_key=
pub async fn delete_saved_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<OwnerQuery>,
) -> Result<StatusCode, ApiError> {
    if state.saved_searches.delete(&params.owner_key, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Saved search {}", id)))
    }
}

/// POST /saved-searches/:id/apply
///
/// 저장된 필터/정렬/검색어를 새 검색 상태로 복사해서 실행.
/// 저장본은 템플릿일 뿐, 이후 변경은 저장본에 반영되지 않음.
pub async fn apply_saved_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let query_state = state
        .saved_searches
        .load_state(&request.owner_key, id)
        .await
        .map_err(|err| match err {
            crate::StoreError::NotFound => ApiError::NotFound(format!("Saved search {}", id)),
            other => other.into(),
        })?;

    let viewer = request
        .investor_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let limit = state.config.page_size(request.limit);
    let result = state
        .discovery
        .query(&query_state, viewer, request.page.unwrap_or(0), limit)
        .await;

    Ok(Json(ApplyResponse {
        state: query_state,
        result,
    }))
}
