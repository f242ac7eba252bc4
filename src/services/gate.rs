//! Confidentiality Gate
//!
//! Per (investor, project) NDA state machine:
//!
//! ```text
//! NoRecord ──sign──▶ Signed (terminal)
//! ```
//!
//! The `Requested` status exists in the record shape but no flow writes it.
//! If such a record shows up it is reported as `Requested` and does NOT unlock
//! the detailed tier.
//!
//! The detailed pitch only leaves this module through a `DetailedAccess` token,
//! which exists only after the gate has observed a signed record.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::NdaService;
use crate::error::StoreResult;
use crate::types::{DetailedPitch, NdaRecord, NdaStatus, Project, ProjectView};

/// 게이트 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    NoRecord,
    Requested,
    Signed,
}

/// 상세 티어 접근 토큰 (게이트만 생성 가능)
#[derive(Debug)]
pub struct DetailedAccess {
    investor_id: String,
    project_id: String,
}

impl DetailedAccess {
    pub fn investor_id(&self) -> &str {
        &self.investor_id
    }

    /// 상세 피치 열람
    ///
    /// # Panics
    ///
    /// 다른 프로젝트에 토큰을 쓰면 panic. 기밀 경계 위반은 프로그래머 오류로 취급.
    pub fn reveal<'p>(&self, project: &'p Project) -> Option<&'p DetailedPitch> {
        assert_eq!(
            self.project_id, project.id,
            "detailed tier access for project {} used on project {}",
            self.project_id, project.id
        );
        project.detailed_pitch.as_ref()
    }
}

pub struct ConfidentialityGate {
    ndas: Arc<dyn NdaService>,
    /// check-then-create 구간 직렬화 (중복 서명 레코드 방지)
    sign_lock: Mutex<()>,
}

impl ConfidentialityGate {
    pub fn new(ndas: Arc<dyn NdaService>) -> Self {
        Self {
            ndas,
            sign_lock: Mutex::new(()),
        }
    }

    /// (investor, project)의 현재 레코드
    ///
    /// 서명 레코드가 하나라도 있으면 가장 먼저 서명된 것이 현재 레코드 (단조성).
    pub async fn current_record(
        &self,
        investor_id: &str,
        project_id: &str,
    ) -> StoreResult<Option<NdaRecord>> {
        let records = self.ndas.list_by_project(project_id).await?;
        Ok(current_of(
            records
                .into_iter()
                .filter(|record| record.investor_id == investor_id),
        ))
    }

    pub async fn state(&self, investor_id: &str, project_id: &str) -> StoreResult<GateState> {
        let state = match self.current_record(investor_id, project_id).await? {
            None => GateState::NoRecord,
            Some(record) if record.is_signed() => GateState::Signed,
            Some(_) => GateState::Requested,
        };
        Ok(state)
    }

    pub async fn can_view_detailed_tier(
        &self,
        investor_id: &str,
        project_id: &str,
    ) -> StoreResult<bool> {
        Ok(self.state(investor_id, project_id).await? == GateState::Signed)
    }

    /// 크리에이터와 메시지 채널을 열 수 있는지 (게이트 상태 읽기일 뿐, 전이 아님)
    pub async fn can_open_channel(&self, investor_id: &str, project_id: &str) -> StoreResult<bool> {
        self.can_view_detailed_tier(investor_id, project_id).await
    }

    /// NDA 서명
    ///
    /// 이미 서명했으면 기존 레코드를 그대로 반환하고 아무것도 쓰지 않음.
    pub async fn sign(&self, investor_id: &str, project_id: &str) -> StoreResult<NdaRecord> {
        let _guard = self.sign_lock.lock().await;

        if let Some(existing) = self.current_record(investor_id, project_id).await? {
            if existing.is_signed() {
                tracing::debug!(
                    "NDA already signed: investor={} project={}",
                    investor_id,
                    project_id
                );
                return Ok(existing);
            }
        }

        let record = NdaRecord::signed_now(investor_id, project_id);
        self.ndas.create(&record).await?;

        tracing::info!("NDA signed: investor={} project={}", investor_id, project_id);
        Ok(record)
    }

    /// 서명 상태일 때만 접근 토큰 발급
    pub async fn detailed_access(
        &self,
        investor_id: &str,
        project_id: &str,
    ) -> StoreResult<Option<DetailedAccess>> {
        let signed = self.can_view_detailed_tier(investor_id, project_id).await?;
        Ok(signed.then(|| DetailedAccess {
            investor_id: investor_id.to_string(),
            project_id: project_id.to_string(),
        }))
    }

    /// 뷰어에게 보낼 프로젝트 페이로드
    ///
    /// 익명 뷰어나 미서명 투자자는 항상 공개 티어만 받음
    pub async fn project_view(
        &self,
        investor_id: Option<&str>,
        project: &Project,
    ) -> StoreResult<ProjectView> {
        let Some(investor_id) = investor_id else {
            return Ok(ProjectView::public(project));
        };

        match self.detailed_access(investor_id, &project.id).await? {
            Some(access) => {
                tracing::debug!(
                    "Detailed tier served: investor={} project={}",
                    access.investor_id(),
                    project.id
                );
                Ok(ProjectView::unlocked(project, access.reveal(project).cloned()))
            }
            None => Ok(ProjectView::public(project)),
        }
    }

    /// 주어진 프로젝트 중 서명 완료된 것들 (결과 목록 데코레이션용)
    pub async fn signed_projects(
        &self,
        investor_id: &str,
        project_ids: &[&str],
    ) -> StoreResult<HashSet<String>> {
        let mut signed = HashSet::new();
        for &project_id in project_ids {
            if self.can_view_detailed_tier(investor_id, project_id).await? {
                signed.insert(project_id.to_string());
            }
        }
        Ok(signed)
    }
}

fn current_of(records: impl Iterator<Item = NdaRecord>) -> Option<NdaRecord> {
    let mut current: Option<NdaRecord> = None;
    for record in records {
        current = match current {
            None => Some(record),
            Some(existing) => Some(prefer(existing, record)),
        };
    }
    current
}

/// 서명 > 요청, 서명끼리는 먼저 서명된 것, 요청끼리는 나중 것
fn prefer(existing: NdaRecord, candidate: NdaRecord) -> NdaRecord {
    match (existing.status, candidate.status) {
        (NdaStatus::Signed, NdaStatus::Requested) => existing,
        (NdaStatus::Requested, NdaStatus::Signed) => candidate,
        (NdaStatus::Signed, NdaStatus::Signed) => {
            if candidate.signed_at < existing.signed_at {
                candidate
            } else {
                existing
            }
        }
        (NdaStatus::Requested, NdaStatus::Requested) => {
            if candidate.requested_at >= existing.requested_at {
                candidate
            } else {
                existing
            }
        }
    }
}
