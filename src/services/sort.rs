//! Sort Engine
//!
//! # Interview Q&A
//!
//! Q: 왜 stable sort여야 하는가?
//! A: 필터를 바꿀 때마다 동점 항목 순서가 뒤섞이면 목록이 "흔들려" 보임
//!    - `slice::sort_by`는 stable (merge sort 계열)
//!    - 방향 반전은 comparator 결과를 `reverse()`로 뒤집음 → Equal은 Equal 유지
//!
//! Q: 방향 규칙은?
//! A: 키마다 기본 순서가 있고 `desc`가 그걸 뒤집음
//!    - recent: 최신순 / popular: 조회수 높은 순 / quality: 점수 높은 순
//!    - alphabetical: 가나다(ABC)순
//!    - funding만 예외: asc = 낮은 금액부터, desc = 높은 금액부터

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::{Project, SortDirection, SortKey, SortSpec};

/// 정렬된 복사본 반환
pub fn apply(projects: &[Project], spec: SortSpec) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sort_in_place(&mut sorted, spec);
    sorted
}

pub fn sort_in_place(projects: &mut [Project], spec: SortSpec) {
    projects.sort_by(|a, b| compare(a, b, spec));
}

fn compare(a: &Project, b: &Project, spec: SortSpec) -> Ordering {
    let base = match spec.key {
        SortKey::Recent => b.created_at.cmp(&a.created_at),
        SortKey::Popular => b.metrics.views.cmp(&a.metrics.views),
        SortKey::Quality => b.metrics.quality_score.cmp(&a.metrics.quality_score),
        SortKey::Alphabetical => compare_text(&a.elevator_pitch.tagline, &b.elevator_pitch.tagline),
        SortKey::Funding => {
            let ascending = a
                .elevator_pitch
                .funding_amount
                .cmp(&b.elevator_pitch.funding_amount);
            return match spec.direction {
                SortDirection::Asc => ascending,
                SortDirection::Desc => ascending.reverse(),
            };
        }
    };

    match spec.direction {
        SortDirection::Asc => base,
        SortDirection::Desc => base.reverse(),
    }
}

/// 악센트/대소문자 무시 비교, 동률이면 원문으로 결정
fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(text: &str) -> String {
    text.trim()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
