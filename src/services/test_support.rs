//! Test fixtures shared by service tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::{
    DetailedPitch, ElevatorPitch, EngagementKind, FundingStage, InvestmentModel, Metrics,
    PilotEngagement, Project,
};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub(crate) struct ProjectBuilder {
    project: Project,
}

pub(crate) fn project(id: &str) -> ProjectBuilder {
    ProjectBuilder {
        project: Project {
            id: id.to_string(),
            sector: "FinTech".to_string(),
            location: "Kenya".to_string(),
            funding_stage: FundingStage::Seed,
            investment_models: Default::default(),
            sdgs: Default::default(),
            elevator_pitch: ElevatorPitch {
                tagline: format!("Project {}", id),
                ..Default::default()
            },
            detailed_pitch: None,
            metrics: Metrics::default(),
            created_at: base_time(),
        },
    }
}

impl ProjectBuilder {
    pub fn sector(mut self, sector: &str) -> Self {
        self.project.sector = sector.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.project.location = location.to_string();
        self
    }

    pub fn stage(mut self, stage: FundingStage) -> Self {
        self.project.funding_stage = stage;
        self
    }

    pub fn models(mut self, models: &[InvestmentModel]) -> Self {
        self.project.investment_models = models.iter().copied().collect();
        self
    }

    pub fn sdgs(mut self, sdgs: &[u8]) -> Self {
        self.project.sdgs = sdgs.iter().copied().collect();
        self
    }

    pub fn funding(mut self, amount: u64) -> Self {
        self.project.elevator_pitch.funding_amount = amount;
        self
    }

    pub fn tagline(mut self, tagline: &str) -> Self {
        self.project.elevator_pitch.tagline = tagline.to_string();
        self
    }

    pub fn problem(mut self, problem: &str) -> Self {
        self.project.elevator_pitch.problem = problem.to_string();
        self
    }

    pub fn video(mut self, url: &str) -> Self {
        self.project.elevator_pitch.video = Some(url.to_string());
        self
    }

    pub fn views(mut self, views: u64) -> Self {
        self.project.metrics.views = views;
        self
    }

    pub fn quality(mut self, score: u8) -> Self {
        self.project.metrics.quality_score = score;
        self
    }

    pub fn minutes_after_base(mut self, minutes: i64) -> Self {
        self.project.created_at = base_time() + Duration::minutes(minutes);
        self
    }

    /// 상세 피치 (파일럿 n개)
    pub fn detail_with_pilots(mut self, pilots: usize) -> Self {
        self.project.detailed_pitch = Some(DetailedPitch {
            pilots: (0..pilots)
                .map(|idx| PilotEngagement {
                    partner: format!("Partner {}", idx),
                    kind: EngagementKind::Pilot,
                    summary: String::new(),
                })
                .collect(),
            sections: Default::default(),
        });
        self
    }

    pub fn build(self) -> Project {
        self.project
    }
}

pub(crate) fn ids(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|project| project.id.as_str()).collect()
}
