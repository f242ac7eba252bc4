//! Persisted Viewer Records
//!
//! NDA records, bookmarks and saved searches. Every record round-trips through
//! plain JSON (sets serialize as arrays).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::query::{FilterSpec, QueryState, SortSpec};

/// NDA 상태
///
/// `Requested`는 레코드 형태에만 존재. 현재 흐름은 곧바로 `Signed`를 기록함.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NdaStatus {
    Requested,
    Signed,
}

impl NdaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NdaStatus::Requested => "requested",
            NdaStatus::Signed => "signed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "requested" => Some(NdaStatus::Requested),
            "signed" => Some(NdaStatus::Signed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdaRecord {
    pub investor_id: String,
    pub project_id: String,
    pub status: NdaStatus,
    pub requested_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl NdaRecord {
    /// 단일 단계 서명: requested_at == signed_at == now
    pub fn signed_now(investor_id: &str, project_id: &str) -> Self {
        let now = Utc::now();
        Self {
            investor_id: investor_id.to_string(),
            project_id: project_id.to_string(),
            status: NdaStatus::Signed,
            requested_at: now,
            signed_at: Some(now),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.status == NdaStatus::Signed
    }
}

/// 투자자 북마크 (메모 + 태그)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub investor_id: String,
    pub project_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new<I, S>(investor_id: &str, project_id: &str, notes: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: Uuid::new_v4(),
            investor_id: investor_id.to_string(),
            project_id: project_id.to_string(),
            notes: notes.trim().to_string(),
            tags: normalize_tags(tags),
            created_at: Utc::now(),
        }
    }
}

/// 태그 정규화: 앞뒤 공백 제거, 빈 태그 제거, 중복 제거
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// 이름 붙은 검색 프리셋
///
/// 템플릿일 뿐 live reference가 아님: 적용 시 복사본을 넘겨줌.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: Uuid,
    pub owner_key: String,
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filter: FilterSpec,
    #[serde(default)]
    pub sort: SortSpec,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn to_query_state(&self) -> QueryState {
        QueryState {
            query: self.query.clone(),
            filter: self.filter.clone(),
            sort: self.sort,
        }
    }
}
