//! NDA Endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    routes::{require_id, InvestorQuery},
    services::GateState,
    types::NdaRecord,
    AppState,
};

// ============ Request/Response Types ============

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub investor_id: String,
    pub project_id: String,
}

#[derive(Debug, Serialize)]
pub struct SignResponse {
    pub record: NdaRecord,
    /// 서명 후 크리에이터와 메시지 채널 개설 가능
    pub can_open_channel: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub project_id: String,
    pub state: GateState,
    pub can_view_detailed_tier: bool,
    pub can_open_channel: bool,
    pub record: Option<NdaRecord>,
}

// ============ Handlers ============

/// POST /nda/sign
///
/// 서명은 되돌릴 수 없음. 이미 서명했으면 기존 레코드를 그대로 반환.
pub async fn sign_nda(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignResponse>, ApiError> {
    let investor_id = require_id("investor_id", &request.investor_id)?;
    let project_id = require_id("project_id", &request.project_id)?;

    if state.discovery.find_project(project_id).await.is_none() {
        return Err(ApiError::NotFound(format!("Project {}", project_id)));
    }

    let record = state.gate.sign(investor_id, project_id).await?;
    let can_open_channel = state.gate.can_open_channel(investor_id, project_id).await?;

    Ok(Json(SignResponse {
        record,
        can_open_channel,
    }))
}

/// GET /nda/:project_id/status?investor_id=
pub async fn get_status(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<InvestorQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let investor_id = params
        .viewer()
        .ok_or_else(|| ApiError::ValidationError("investor_id is required".to_string()))?;

    let record = state.gate.current_record(investor_id, &project_id).await?;
    let gate_state = state.gate.state(investor_id, &project_id).await?;
    let signed = gate_state == GateState::Signed;

    Ok(Json(StatusResponse {
        project_id,
        state: gate_state,
        can_view_detailed_tier: signed,
        can_open_channel: signed,
        record,
    }))
}
