//! Venture Discovery API Server
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client (Frontend)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum Web Server                         │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                      Routes Layer                        ││
//! │  │  /discovery  /projects  /nda  /saved-searches /bookmarks ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Services Layer                        ││
//! │  │  DiscoveryEngine  ConfidentialityGate  BookmarkStore     ││
//! │  │  SavedSearchStore  (filter / sort engines)               ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │                    Data Layer                            ││
//! │  │  PostgreSQL Repository    In-memory stores               ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Catalog service (optional, HTTP)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// 라이브러리에서 가져오기
use venture_discovery_api::{
    routes,
    services::HttpCatalog,
    types::Project,
    AppState, Backends, Config, Database,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=debug,sqlx=warn 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "venture_discovery_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting Venture Discovery API Server");

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("📋 Configuration loaded");

    // 시드 프로젝트 (선택)
    let seed = match &config.catalog_seed_path {
        Some(path) => load_seed(path).await?,
        None => Vec::new(),
    };

    // 저장소 선택: DATABASE_URL 있으면 PostgreSQL, 없으면 인메모리
    let (db, mut backends) = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url).await?;
            tracing::info!("🗄️  Database connected");

            // 마이그레이션 실행
            db.run_migrations().await?;
            tracing::info!("📦 Migrations completed");

            for project in &seed {
                db.upsert_project(project, "live").await?;
            }

            let db = Arc::new(db);
            (Some(db.clone()), Backends::postgres(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            (None, Backends::in_memory(seed))
        }
    };

    // 원격 카탈로그가 설정되어 있으면 우선
    if let Some(url) = &config.catalog_url {
        backends.catalog = Arc::new(HttpCatalog::new(url)?);
        tracing::info!("📚 Remote catalog: {}", url);
    }

    let port = config.port;
    let state = AppState::new(config, db, backends);

    // 라우터 구성
    let app = routes::create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 시드 파일 로드 (프로젝트 JSON 배열)
async fn load_seed(path: &str) -> anyhow::Result<Vec<Project>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog seed {}", path))?;
    let projects: Vec<Project> = serde_json::from_str(&raw)
        .context("Catalog seed must be a JSON array of projects")?;

    tracing::info!("🌱 Loaded {} seed projects", projects.len());
    Ok(projects)
}
