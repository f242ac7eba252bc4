//! Database Module
//!
//! # Interview Q&A
//!
//! Q: 왜 PostgreSQL을 선택했는가?
//! A: NDA / 북마크 데이터에 적합한 이유
//!
//!    1. ACID 트랜잭션: NDA 서명 기록 무결성
//!    2. JSONB: 업스트림 프로젝트 레코드를 그대로 저장
//!    3. UNIQUE 제약: (investor, project) 당 북마크 1개를 DB 레벨에서 보장
//!
//! Q: 커넥션 풀은 어떻게 관리하는가?
//! A: SQLx의 PgPool 사용
//!    - 최소/최대 커넥션 수 설정
//!    - 커넥션 재사용 (오버헤드 감소)
//!    - 타임아웃 처리

pub mod memory;
mod models;
mod repository;

pub use models::*;
pub use repository::{BookmarkService, CatalogService, NdaService, SavedSearchPersistence};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::types::{Bookmark, NdaRecord, Project};

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// 프로젝트 upsert (업스트림 동기화/시드용)
    pub async fn upsert_project(&self, project: &Project, status: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, status, payload, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET
                status = EXCLUDED.status,
                payload = EXCLUDED.payload
            "#
        )
        .bind(&project.id)
        .bind(status)
        .bind(Json(project))
        .bind(project.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CatalogService for Database {
    async fn list_live_projects(&self) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, status, payload
            FROM projects
            WHERE status = 'live'
            ORDER BY created_at ASC, id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.payload.0).collect())
    }
}

#[async_trait]
impl NdaService for Database {
    async fn create(&self, record: &NdaRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO nda_records (investor_id, project_id, status, requested_at, signed_at)
            VALUES ($1, $2, $3, $4, $5)
            "#
        )
        .bind(&record.investor_id)
        .bind(&record.project_id)
        .bind(record.status.as_str())
        .bind(record.requested_at)
        .bind(record.signed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_project(&self, project_id: &str) -> StoreResult<Vec<NdaRecord>> {
        let rows = sqlx::query_as::<_, NdaRow>(
            r#"
            SELECT investor_id, project_id, status, requested_at, signed_at
            FROM nda_records
            WHERE project_id = $1
            ORDER BY id ASC
            "#
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(NdaRecord::try_from).collect()
    }
}

#[async_trait]
impl BookmarkService for Database {
    async fn create(&self, bookmark: &Bookmark) -> StoreResult<()> {
        let tags: Vec<String> = bookmark.tags.iter().cloned().collect();
        let result = sqlx::query(
            r#"
            INSERT INTO bookmarks (id, investor_id, project_id, notes, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (investor_id, project_id) DO NOTHING
            "#
        )
        .bind(bookmark.id)
        .bind(&bookmark.investor_id)
        .bind(&bookmark.project_id)
        .bind(&bookmark.notes)
        .bind(&tags)
        .bind(bookmark.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "bookmark already exists for project {}",
                bookmark.project_id
            )));
        }
        Ok(())
    }

    async fn update(&self, bookmark: &Bookmark) -> StoreResult<()> {
        let tags: Vec<String> = bookmark.tags.iter().cloned().collect();
        let result = sqlx::query("UPDATE bookmarks SET notes = $2, tags = $3 WHERE id = $1")
            .bind(bookmark.id)
            .bind(&bookmark.notes)
            .bind(&tags)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_by_investor(&self, investor_id: &str) -> StoreResult<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, BookmarkRow>(
            r#"
            SELECT id, investor_id, project_id, notes, tags, created_at
            FROM bookmarks
            WHERE investor_id = $1
            ORDER BY created_at ASC
            "#
        )
        .bind(investor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Bookmark::from).collect())
    }
}

#[async_trait]
impl SavedSearchPersistence for Database {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: String) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
