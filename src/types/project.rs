//! Project Catalog Types
//!
//! A project carries two tiers of data: the always-public elevator pitch and the
//! NDA-gated detailed pitch. Payload types handed to viewers (`PublicProject`,
//! `ProjectView`) are built so the detailed tier can only travel through the gate.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::query::{parse_bound, parse_score, Rounding};

/// 펀딩 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    Growth,
}

impl FundingStage {
    pub const ALL: [FundingStage; 5] = [
        FundingStage::PreSeed,
        FundingStage::Seed,
        FundingStage::SeriesA,
        FundingStage::SeriesB,
        FundingStage::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingStage::PreSeed => "pre-seed",
            FundingStage::Seed => "seed",
            FundingStage::SeriesA => "series-a",
            FundingStage::SeriesB => "series-b",
            FundingStage::Growth => "growth",
        }
    }
}

/// 투자 모델
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentModel {
    Equity,
    ConvertibleNote,
    Safe,
    RevenueShare,
    Debt,
    Grant,
}

impl InvestmentModel {
    pub const ALL: [InvestmentModel; 6] = [
        InvestmentModel::Equity,
        InvestmentModel::ConvertibleNote,
        InvestmentModel::Safe,
        InvestmentModel::RevenueShare,
        InvestmentModel::Debt,
        InvestmentModel::Grant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentModel::Equity => "equity",
            InvestmentModel::ConvertibleNote => "convertible-note",
            InvestmentModel::Safe => "safe",
            InvestmentModel::RevenueShare => "revenue-share",
            InvestmentModel::Debt => "debt",
            InvestmentModel::Grant => "grant",
        }
    }
}

/// 필터 입력에서 들어오는 값은 대소문자/구분자가 제각각이므로 정규화 후 비교
fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['_', ' '], "-")
}

impl FromStr for FundingStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        FundingStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == token)
            .ok_or_else(|| format!("unknown funding stage: {}", s))
    }
}

impl FromStr for InvestmentModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        InvestmentModel::ALL
            .into_iter()
            .find(|model| model.as_str() == token)
            .ok_or_else(|| format!("unknown investment model: {}", s))
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InvestmentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 공개 티어: 엘리베이터 피치
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorPitch {
    pub tagline: String,
    pub problem: String,
    pub solution: String,
    pub traction: String,
    /// 목표 펀딩 금액 (정수, 통화 단위 그대로)
    pub funding_amount: u64,
    pub images: Vec<String>,
    pub video: Option<String>,
}

impl ElevatorPitch {
    /// 빈 문자열 URL은 영상 없음으로 취급
    pub fn has_video(&self) -> bool {
        self.video.as_deref().is_some_and(|url| !url.trim().is_empty())
    }
}

/// 파일럿 / LOI 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    Pilot,
    Loi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotEngagement {
    pub partner: String,
    pub kind: EngagementKind,
    #[serde(default)]
    pub summary: String,
}

/// 기밀 티어: 상세 피치
///
/// 코어는 `pilots` 외의 내용을 해석하지 않음. 나머지 필드는 그대로 보존해서 전달.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedPitch {
    #[serde(default)]
    pub pilots: Vec<PilotEngagement>,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

/// 조회/북마크/품질 지표. 누락되거나 읽을 수 없는 값은 0.
///
/// 지표 하나가 깨졌다고 카탈로그 전체를 버리지 않음.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    #[serde(deserialize_with = "lenient_count")]
    pub views: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub bookmarks: u64,
    /// 0 ~ 100, 업스트림에서 계산됨. 범위 밖은 100으로 클램프.
    #[serde(deserialize_with = "lenient_quality")]
    pub quality_score: u8,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| parse_bound(value, Rounding::Down))
        .unwrap_or(0))
}

fn lenient_quality<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|value| parse_score(value, Rounding::Down))
        .unwrap_or(0))
}

/// 카탈로그 프로젝트 (코어 입장에서는 불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub sector: String,
    /// 국가명
    pub location: String,
    pub funding_stage: FundingStage,
    #[serde(default)]
    pub investment_models: BTreeSet<InvestmentModel>,
    #[serde(default)]
    pub sdgs: BTreeSet<u8>,
    pub elevator_pitch: ElevatorPitch,
    #[serde(default)]
    pub detailed_pitch: Option<DetailedPitch>,
    #[serde(default)]
    pub metrics: Metrics,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// 상세 피치에 파일럿/LOI가 하나 이상 있는지
    pub fn has_pilots(&self) -> bool {
        self.detailed_pitch
            .as_ref()
            .is_some_and(|detail| !detail.pilots.is_empty())
    }
}

/// 뷰어에게 전달되는 공개 페이로드. 상세 피치 필드 자체가 없음.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicProject {
    pub id: String,
    pub sector: String,
    pub location: String,
    pub funding_stage: FundingStage,
    pub investment_models: BTreeSet<InvestmentModel>,
    pub sdgs: BTreeSet<u8>,
    pub elevator_pitch: ElevatorPitch,
    pub metrics: Metrics,
    pub created_at: DateTime<Utc>,
    /// 상세 피치 존재 여부만 노출 (NDA 유도용)
    pub has_detailed_pitch: bool,
}

impl From<&Project> for PublicProject {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            sector: project.sector.clone(),
            location: project.location.clone(),
            funding_stage: project.funding_stage,
            investment_models: project.investment_models.clone(),
            sdgs: project.sdgs.clone(),
            elevator_pitch: project.elevator_pitch.clone(),
            metrics: project.metrics,
            created_at: project.created_at,
            has_detailed_pitch: project.detailed_pitch.is_some(),
        }
    }
}

/// 프로젝트 상세 화면 페이로드
///
/// 생성자는 crate 내부 전용. 상세 티어가 채워진 뷰는
/// `ConfidentialityGate`가 서명 상태를 확인한 뒤에만 만들 수 있음.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    project: PublicProject,
    nda_signed: bool,
    detailed_pitch: Option<DetailedPitch>,
}

impl ProjectView {
    pub(crate) fn public(project: &Project) -> Self {
        Self {
            project: PublicProject::from(project),
            nda_signed: false,
            detailed_pitch: None,
        }
    }

    pub(crate) fn unlocked(project: &Project, detailed_pitch: Option<DetailedPitch>) -> Self {
        Self {
            project: PublicProject::from(project),
            nda_signed: true,
            detailed_pitch,
        }
    }

    pub fn project(&self) -> &PublicProject {
        &self.project
    }

    pub fn nda_signed(&self) -> bool {
        self.nda_signed
    }

    pub fn detailed_pitch(&self) -> Option<&DetailedPitch> {
        self.detailed_pitch.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parsing_is_lenient_about_case_and_separators() {
        assert_eq!("Series A".parse::<FundingStage>(), Ok(FundingStage::SeriesA));
        assert_eq!("pre_seed".parse::<FundingStage>(), Ok(FundingStage::PreSeed));
        assert!("series-z".parse::<FundingStage>().is_err());
    }

    #[test]
    fn test_model_serde_names() {
        let json = serde_json::to_string(&InvestmentModel::ConvertibleNote).unwrap();
        assert_eq!(json, "\"convertible-note\"");
        assert_eq!("Revenue Share".parse::<InvestmentModel>(), Ok(InvestmentModel::RevenueShare));
    }

    #[test]
    fn test_project_defaults_missing_metrics_and_detail() {
        let json = r#"{
            "id": "p1",
            "sector": "FinTech",
            "location": "Kenya",
            "funding_stage": "seed",
            "elevator_pitch": { "tagline": "Mobile savings", "funding_amount": 50000 },
            "created_at": "2024-01-15T10:30:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();

        assert_eq!(project.metrics, Metrics::default());
        assert!(project.detailed_pitch.is_none());
        assert!(!project.has_pilots());
        assert!(!project.elevator_pitch.has_video());
    }

    #[test]
    fn test_out_of_range_metrics_do_not_reject_project() {
        let json = r#"{
            "id": "p9",
            "sector": "AgriTech",
            "location": "Ghana",
            "funding_stage": "seed",
            "elevator_pitch": { "tagline": "Cold storage", "funding_amount": 1000 },
            "metrics": { "views": -4, "bookmarks": "12", "quality_score": 300 },
            "created_at": "2024-01-15T10:30:00Z"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(
            project.metrics,
            Metrics { views: 0, bookmarks: 12, quality_score: 100 }
        );

        let metrics: Metrics =
            serde_json::from_value(serde_json::json!({ "quality_score": "high", "views": 7.9 })).unwrap();
        assert_eq!(metrics, Metrics { views: 7, bookmarks: 0, quality_score: 0 });
    }

    #[test]
    fn test_detailed_pitch_keeps_opaque_sections() {
        let json = r#"{"pilots":[{"partner":"Acme","kind":"loi"}],"financials":{"arr":1200}}"#;
        let detail: DetailedPitch = serde_json::from_str(json).unwrap();

        assert_eq!(detail.pilots.len(), 1);
        assert_eq!(detail.pilots[0].kind, EngagementKind::Loi);
        assert!(detail.sections.contains_key("financials"));
    }

    #[test]
    fn test_public_projection_has_no_detail_field() {
        let project = Project {
            id: "p1".to_string(),
            sector: "FinTech".to_string(),
            location: "Kenya".to_string(),
            funding_stage: FundingStage::Seed,
            investment_models: BTreeSet::new(),
            sdgs: BTreeSet::new(),
            elevator_pitch: ElevatorPitch::default(),
            detailed_pitch: Some(DetailedPitch::default()),
            metrics: Metrics::default(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(ProjectView::public(&project)).unwrap();
        assert!(json["detailed_pitch"].is_null());
        assert_eq!(json["has_detailed_pitch"], true);
    }
}
