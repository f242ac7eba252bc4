//! Project Detail Endpoint
//!
//! 상세 피치는 NDA 서명 상태일 때만 포함됨. 응답 타입 `ProjectView`는
//! 게이트를 거치지 않고는 만들 수 없음.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{error::ApiError, routes::InvestorQuery, types::ProjectView, AppState};

/// GET /projects/:id?investor_id=
///
/// # Response
///
/// ```json
/// {
///   "id": "p1",
///   "sector": "FinTech",
///   "elevator_pitch": { "tagline": "...", "funding_amount": 50000 },
///   "has_detailed_pitch": true,
///   "nda_signed": false,
///   "detailed_pitch": null
/// }
/// ```
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<InvestorQuery>,
) -> Result<Json<ProjectView>, ApiError> {
    let project = state
        .discovery
        .find_project(&project_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Project {}", project_id)))?;

    let view = state.gate.project_view(params.viewer(), &project).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    #[tokio::test]
    async fn test_anonymous_viewer_gets_public_tier() {
        let (status, body) = send(&app(), Method::GET, "/projects/p1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "p1");
        assert_eq!(body["nda_signed"], false);
        assert!(body["detailed_pitch"].is_null());
    }

    #[tokio::test]
    async fn test_detailed_tier_after_signing() {
        let app = app();

        let (_, before) = send(&app, Method::GET, "/projects/p1?investor_id=inv-1", None).await;
        assert!(before["detailed_pitch"].is_null());

        let sign = json!({ "investor_id": "inv-1", "project_id": "p1" });
        let (status, _) = send(&app, Method::POST, "/nda/sign", Some(sign)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, after) = send(&app, Method::GET, "/projects/p1?investor_id=inv-1", None).await;
        assert_eq!(after["nda_signed"], true);
        assert_eq!(after["detailed_pitch"]["pilots"].as_array().unwrap().len(), 1);

        // 다른 투자자에게는 여전히 잠김
        let (_, other) = send(&app, Method::GET, "/projects/p1?investor_id=inv-2", None).await;
        assert!(other["detailed_pitch"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_project_is_404() {
        let (status, body) = send(&app(), Method::GET, "/projects/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
