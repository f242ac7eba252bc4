//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 정의
//!
//! - `project`: 카탈로그 프로젝트와 공개/기밀 티어
//! - `query`: 필터/정렬/검색 상태 값 타입
//! - `records`: NDA, 북마크, 저장된 검색

mod project;
mod query;
mod records;

pub use project::*;
pub use query::*;
pub use records::*;

use serde::Serialize;

/// 페이지네이션 메타데이터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let seen = (u64::from(page) + 1) * u64::from(limit);
        Self {
            page,
            limit,
            total,
            has_next: seen < total,
        }
    }

    /// 현재 페이지의 [start, end) 범위 (total 넘어가면 빈 범위)
    pub fn window(&self) -> std::ops::Range<usize> {
        let total = self.total as usize;
        let start = (self.page as usize).saturating_mul(self.limit as usize).min(total);
        let end = start.saturating_add(self.limit as usize).min(total);
        start..end
    }
}

/// 페이지 단위 응답
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// 전체 목록에서 한 페이지 잘라내기
    pub fn slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let pagination = Pagination::new(page, limit, all.len() as u64);
        let window = pagination.window();
        let items = all
            .into_iter()
            .skip(window.start)
            .take(window.end - window.start)
            .collect();
        Self { items, pagination }
    }
}
