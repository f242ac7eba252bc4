//! Health Check Endpoint
//!
//! 프로세스 상태 + 저장소 상태 ("깊은 헬스체크").
//! DB가 설정되지 않은 인메모리 모드는 `not_configured`로 보고하고 healthy 유지.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check 응답
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    /// connected | disconnected | not_configured
    pub state: &'static str,
    pub latency_ms: Option<u64>,
}

/// GET /health
///
/// 서버 및 의존성 상태 확인
pub async fn health_check(
    State(state): State<AppState>,
) -> Json<HealthResponse> {
    let db_status = match &state.db {
        None => DatabaseStatus {
            state: "not_configured",
            latency_ms: None,
        },
        Some(db) => {
            // DB 연결 테스트
            let db_start = std::time::Instant::now();
            match db.health_check().await {
                Ok(_) => DatabaseStatus {
                    state: "connected",
                    latency_ms: Some(db_start.elapsed().as_millis() as u64),
                },
                Err(err) => {
                    tracing::warn!("Database health check failed: {}", err);
                    DatabaseStatus {
                        state: "disconnected",
                        latency_ms: None,
                    }
                }
            }
        }
    };

    let healthy = db_status.state != "disconnected";

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
