//! Database Models
//!
//! Row shapes for the PostgreSQL backend. Projects are stored as JSONB payloads
//! because the core treats them as immutable upstream records.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Bookmark, NdaRecord, NdaStatus, Project};

/// 카탈로그 프로젝트 행
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    /// live / draft / archived (업스트림이 관리)
    pub status: String,
    pub payload: Json<Project>,
}

/// NDA 레코드 행
#[derive(Debug, Clone, FromRow)]
pub struct NdaRow {
    pub investor_id: String,
    pub project_id: String,
    /// requested | signed
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
}

impl TryFrom<NdaRow> for NdaRecord {
    type Error = StoreError;

    fn try_from(row: NdaRow) -> Result<Self, Self::Error> {
        let status = NdaStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown NDA status: {}", row.status)))?;
        Ok(NdaRecord {
            investor_id: row.investor_id,
            project_id: row.project_id,
            status,
            requested_at: row.requested_at,
            signed_at: row.signed_at,
        })
    }
}

/// 북마크 행 (tags는 TEXT[])
#[derive(Debug, Clone, FromRow)]
pub struct BookmarkRow {
    pub id: Uuid,
    pub investor_id: String,
    pub project_id: String,
    pub notes: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookmarkRow> for Bookmark {
    fn from(row: BookmarkRow) -> Self {
        Bookmark {
            id: row.id,
            investor_id: row.investor_id,
            project_id: row.project_id,
            notes: row.notes,
            tags: row.tags.into_iter().collect(),
            created_at: row.created_at,
        }
    }
}
