//! Bookmark Endpoints
//!
//! (investor, project)당 북마크 하나. 생성은 toggle로만: 있으면 삭제, 없으면 생성.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    routes::{require_id, InvestorQuery},
    services::ToggleOutcome,
    types::Bookmark,
    AppState,
};

// ============ Request Types ============

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub investor_id: String,
    pub project_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub investor_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn require_investor(params: &InvestorQuery) -> Result<&str, ApiError> {
    params
        .viewer()
        .ok_or_else(|| ApiError::ValidationError("investor_id is required".to_string()))
}

// ============ Handlers ============

/// GET /bookmarks?investor_id=
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(params): Query<InvestorQuery>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let investor_id = require_investor(&params)?;
    Ok(Json(state.bookmarks.list_by_investor(investor_id).await?))
}

/// POST /bookmarks/toggle
///
/// # Response
///
/// ```json
/// { "action": "created", "bookmark": { "id": "...", "project_id": "p1", ... } }
/// ```
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleOutcome>, ApiError> {
    let investor_id = require_id("investor_id", &request.investor_id)?;
    let project_id = require_id("project_id", &request.project_id)?;

    if state.discovery.find_project(project_id).await.is_none() {
        return Err(ApiError::NotFound(format!("Project {}", project_id)));
    }

    let outcome = state
        .bookmarks
        .toggle(investor_id, project_id, &request.notes, &request.tags)
        .await?;
    Ok(Json(outcome))
}

/// PUT /bookmarks/:id
///
/// 메모/태그 교체 (소유 투자자만)
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<Bookmark>, ApiError> {
    let investor_id = require_id("investor_id", &request.investor_id)?;
    let bookmark = state
        .bookmarks
        .update(investor_id, id, &request.notes, &request.tags)
        .await?;
    Ok(Json(bookmark))
}

/// DELETE /bookmarks/:id?investor_id=
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<InvestorQuery>,
) -> Result<StatusCode, ApiError> {
    let investor_id = require_investor(&params)?;
    state.bookmarks.delete(investor_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_toggle_update_delete() {
        let app = app();
        let toggle = json!({
            "investor_id": "inv-1",
            "project_id": "p1",
            "notes": "strong team",
            "tags": ["agri", " ", "agri"]
        });

        let (status, created) = send(&app, Method::POST, "/bookmarks/toggle", Some(toggle)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["action"], "created");
        assert_eq!(created["bookmark"]["tags"], json!(["agri"]));
        let id = created["bookmark"]["id"].as_str().unwrap().to_string();

        let update = json!({ "investor_id": "inv-1", "notes": "call next week", "tags": ["q3"] });
        let (status, updated) = send(&app, Method::PUT, &format!("/bookmarks/{}", id), Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["notes"], "call next week");

        let (_, list) = send(&app, Method::GET, "/bookmarks?investor_id=inv-1", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["tags"], json!(["q3"]));

        let uri = format!("/bookmarks/{}?investor_id=inv-1", id);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, list) = send(&app, Method::GET, "/bookmarks?investor_id=inv-1", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_removes() {
        let app = app();
        let toggle = json!({ "investor_id": "inv-1", "project_id": "p2" });

        send(&app, Method::POST, "/bookmarks/toggle", Some(toggle.clone())).await;
        let (_, second) = send(&app, Method::POST, "/bookmarks/toggle", Some(toggle)).await;
        assert_eq!(second["action"], "removed");

        let (_, list) = send(&app, Method::GET, "/bookmarks?investor_id=inv-1", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bookmark_shows_in_discovery() {
        let app = app();
        let toggle = json!({ "investor_id": "inv-1", "project_id": "p3", "notes": "watch" });
        send(&app, Method::POST, "/bookmarks/toggle", Some(toggle)).await;

        let query = json!({ "investor_id": "inv-1", "filter": { "countries": ["Ghana"] } });
        let (_, body) = send(&app, Method::POST, "/discovery/query", Some(query)).await;
        assert_eq!(body["items"][0]["bookmark"]["notes"], "watch");
    }

    #[tokio::test]
    async fn test_other_investor_cannot_delete() {
        let app = app();
        let toggle = json!({ "investor_id": "inv-1", "project_id": "p1" });
        let (_, created) = send(&app, Method::POST, "/bookmarks/toggle", Some(toggle)).await;
        let id = created["bookmark"]["id"].as_str().unwrap().to_string();

        let uri = format!("/bookmarks/{}?investor_id=inv-2", id);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_requires_investor() {
        let (status, _) = send(&app(), Method::GET, "/bookmarks", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
