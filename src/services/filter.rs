//! Filter Engine
//!
//! Pure `Project[] × FilterSpec × query → Project[]`.
//!
//! Semantics:
//! - AND across active facets, OR within one multi-select facet
//! - an empty facet set is unconstrained; `FilterSpec::default()` is the identity filter
//! - output keeps input order
//! - unknown facet values match nothing, they never widen or error

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use crate::types::{FilterSpec, FundingRange, FundingStage, InvestmentModel, Project};

use super::vocabulary::region_for;

/// 카탈로그 필터링
pub fn apply(catalog: &[Project], spec: &FilterSpec, query_text: &str) -> Vec<Project> {
    let compiled = CompiledFilter::new(spec, query_text);
    catalog
        .iter()
        .filter(|project| compiled.matches(project))
        .cloned()
        .collect()
}

/// 한 번 파싱해 둔 필터 (프로젝트마다 문자열 파싱 반복 방지)
pub struct CompiledFilter<'a> {
    needle: Option<String>,
    sectors: &'a BTreeSet<String>,
    countries: &'a BTreeSet<String>,
    regions: &'a BTreeSet<String>,
    /// None = 제약 없음, Some(빈 집합) = 모든 값이 미지 → 아무것도 매치 안 함
    stages: Option<HashSet<FundingStage>>,
    models: Option<HashSet<InvestmentModel>>,
    sdgs: &'a BTreeSet<u32>,
    funding: FundingRange,
    quality_min: Option<u8>,
    has_video: Option<bool>,
    has_pilots: Option<bool>,
}

impl<'a> CompiledFilter<'a> {
    pub fn new(spec: &'a FilterSpec, query_text: &str) -> Self {
        let needle = query_text.trim();
        Self {
            needle: (!needle.is_empty()).then(|| needle.to_lowercase()),
            sectors: &spec.sectors,
            countries: &spec.countries,
            regions: &spec.regions,
            stages: parse_selection(&spec.funding_stages),
            models: parse_selection(&spec.investment_models),
            sdgs: &spec.sdgs,
            funding: spec.funding_range,
            quality_min: spec.quality_score_min.filter(|min| *min > 0),
            has_video: spec.has_video,
            has_pilots: spec.has_pilots,
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        if let Some(needle) = &self.needle {
            if !text_matches(project, needle) {
                return false;
            }
        }
        if !self.sectors.is_empty() && !self.sectors.contains(&project.sector) {
            return false;
        }
        if !self.countries.is_empty() && !self.countries.contains(&project.location) {
            return false;
        }
        if !self.regions.is_empty() {
            let in_region = region_for(&project.location)
                .is_some_and(|region| self.regions.contains(region));
            if !in_region {
                return false;
            }
        }
        if let Some(stages) = &self.stages {
            if !stages.contains(&project.funding_stage) {
                return false;
            }
        }
        if let Some(models) = &self.models {
            if !project.investment_models.iter().any(|model| models.contains(model)) {
                return false;
            }
        }
        if !self.sdgs.is_empty()
            && !project
                .sdgs
                .iter()
                .any(|sdg| self.sdgs.contains(&u32::from(*sdg)))
        {
            return false;
        }
        if !self.funding.contains(project.elevator_pitch.funding_amount) {
            return false;
        }
        if let Some(min) = self.quality_min {
            if project.metrics.quality_score < min {
                return false;
            }
        }
        if let Some(wanted) = self.has_video {
            if project.elevator_pitch.has_video() != wanted {
                return false;
            }
        }
        if let Some(wanted) = self.has_pilots {
            if project.has_pilots() != wanted {
                return false;
            }
        }
        true
    }
}

fn parse_selection<T>(raw: &BTreeSet<String>) -> Option<HashSet<T>>
where
    T: FromStr + Eq + std::hash::Hash,
{
    if raw.is_empty() {
        return None;
    }
    let parsed: HashSet<T> = raw
        .iter()
        .filter_map(|token| match token.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!("Ignoring unknown facet value: {}", token);
                None
            }
        })
        .collect();
    Some(parsed)
}

/// 자유 텍스트: tagline / problem / solution / traction / sector / location 중 하나라도 포함
fn text_matches(project: &Project, needle: &str) -> bool {
    let pitch = &project.elevator_pitch;
    [
        pitch.tagline.as_str(),
        pitch.problem.as_str(),
        pitch.solution.as_str(),
        pitch.traction.as_str(),
        project.sector.as_str(),
        project.location.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
