//! Remote Catalog Client
//!
//! Fetches the live project list from an upstream catalog service over HTTP.
//! Live-status filtering happens upstream; this client only decodes the array.

use std::time::Duration;

use async_trait::async_trait;

use crate::db::CatalogService;
use crate::error::{StoreError, StoreResult};
use crate::types::Project;

/// 원격 카탈로그 서비스
///
/// # Timeout
///
/// 5초. 실패는 일시적 조회 실패로 보고 디스커버리가 마지막 스냅샷으로 복구함
pub struct HttpCatalog {
    client: reqwest::Client,
    catalog_url: String,
}

impl HttpCatalog {
    const TIMEOUT_SECS: u64 = 5;

    pub fn new(catalog_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            catalog_url: catalog_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/projects?status=live", self.catalog_url)
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn list_live_projects(&self) -> StoreResult<Vec<Project>> {
        let response = self.client.get(self.endpoint()).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "catalog responded with {}",
                response.status()
            )));
        }

        let projects: Vec<Project> = response.json().await?;
        tracing::debug!("Fetched {} live projects from catalog", projects.len());
        Ok(projects)
    }
}
