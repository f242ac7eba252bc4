//! Facet Vocabularies
//!
//! Static lists the UI enumerates for filter controls, plus the country → region
//! lookup used by the region facet.

use serde::Serialize;

use crate::types::{FundingStage, InvestmentModel};

/// 섹터 카탈로그
pub const SECTORS: &[&str] = &[
    "AgriTech",
    "CleanTech",
    "EdTech",
    "FinTech",
    "HealthTech",
    "Logistics",
    "E-commerce",
    "Manufacturing",
    "Media",
    "PropTech",
    "Tourism",
    "Water & Sanitation",
];

/// UN 지속가능발전목표 (1 ~ 17)
pub const SDGS: [&str; 17] = [
    "No Poverty",
    "Zero Hunger",
    "Good Health and Well-being",
    "Quality Education",
    "Gender Equality",
    "Clean Water and Sanitation",
    "Affordable and Clean Energy",
    "Decent Work and Economic Growth",
    "Industry, Innovation and Infrastructure",
    "Reduced Inequalities",
    "Sustainable Cities and Communities",
    "Responsible Consumption and Production",
    "Climate Action",
    "Life Below Water",
    "Life on Land",
    "Peace, Justice and Strong Institutions",
    "Partnerships for the Goals",
];

pub const REGIONS: &[&str] = &[
    "Africa",
    "Asia",
    "Europe",
    "Latin America",
    "Middle East",
    "North America",
    "Oceania",
];

/// 국가 → 지역 테이블. 여기 없는 국가는 지역 필터에 절대 매치되지 않음.
const COUNTRY_REGIONS: &[(&str, &str)] = &[
    // Africa
    ("Kenya", "Africa"),
    ("Nigeria", "Africa"),
    ("Ghana", "Africa"),
    ("South Africa", "Africa"),
    ("Rwanda", "Africa"),
    ("Uganda", "Africa"),
    ("Tanzania", "Africa"),
    ("Ethiopia", "Africa"),
    ("Senegal", "Africa"),
    ("Côte d'Ivoire", "Africa"),
    ("Morocco", "Africa"),
    ("Egypt", "Africa"),
    ("Zambia", "Africa"),
    ("Zimbabwe", "Africa"),
    ("Cameroon", "Africa"),
    // Asia
    ("India", "Asia"),
    ("Indonesia", "Asia"),
    ("Philippines", "Asia"),
    ("Vietnam", "Asia"),
    ("Bangladesh", "Asia"),
    ("Pakistan", "Asia"),
    ("Singapore", "Asia"),
    ("Japan", "Asia"),
    ("South Korea", "Asia"),
    ("China", "Asia"),
    // Europe
    ("United Kingdom", "Europe"),
    ("Germany", "Europe"),
    ("France", "Europe"),
    ("Netherlands", "Europe"),
    ("Spain", "Europe"),
    ("Italy", "Europe"),
    ("Sweden", "Europe"),
    ("Switzerland", "Europe"),
    ("Portugal", "Europe"),
    ("Ireland", "Europe"),
    // Latin America
    ("Brazil", "Latin America"),
    ("Mexico", "Latin America"),
    ("Colombia", "Latin America"),
    ("Argentina", "Latin America"),
    ("Chile", "Latin America"),
    ("Peru", "Latin America"),
    // Middle East
    ("United Arab Emirates", "Middle East"),
    ("Saudi Arabia", "Middle East"),
    ("Israel", "Middle East"),
    ("Jordan", "Middle East"),
    ("Turkey", "Middle East"),
    // North America
    ("United States", "North America"),
    ("Canada", "North America"),
    // Oceania
    ("Australia", "Oceania"),
    ("New Zealand", "Oceania"),
];

/// 국가명으로 지역 조회 (대소문자/앞뒤 공백 무시)
pub fn region_for(country: &str) -> Option<&'static str> {
    let country = country.trim();
    COUNTRY_REGIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(country) || *name == country)
        .map(|(_, region)| *region)
}

#[derive(Debug, Clone, Serialize)]
pub struct Sdg {
    pub number: u8,
    pub name: &'static str,
}

/// 필터 UI용 어휘 묶음
#[derive(Debug, Clone, Serialize)]
pub struct FacetVocabulary {
    pub sectors: Vec<&'static str>,
    pub sdgs: Vec<Sdg>,
    pub regions: Vec<&'static str>,
    pub funding_stages: Vec<&'static str>,
    pub investment_models: Vec<&'static str>,
}

pub struct SectorCatalog;

impl SectorCatalog {
    pub fn list() -> Vec<&'static str> {
        SECTORS.to_vec()
    }
}

pub struct SdgCatalog;

impl SdgCatalog {
    pub fn list() -> Vec<Sdg> {
        SDGS.into_iter()
            .enumerate()
            .map(|(idx, name)| Sdg {
                number: idx as u8 + 1,
                name,
            })
            .collect()
    }
}

impl FacetVocabulary {
    pub fn load() -> Self {
        Self {
            sectors: SectorCatalog::list(),
            sdgs: SdgCatalog::list(),
            regions: REGIONS.to_vec(),
            funding_stages: FundingStage::ALL.iter().map(|s| s.as_str()).collect(),
            investment_models: InvestmentModel::ALL.iter().map(|m| m.as_str()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_lookup() {
        assert_eq!(region_for("Kenya"), Some("Africa"));
        assert_eq!(region_for(" kenya "), Some("Africa"));
        assert_eq!(region_for("Côte d'Ivoire"), Some("Africa"));
        assert_eq!(region_for("Atlantis"), None);
    }

    #[test]
    fn test_every_mapped_region_is_listed() {
        for (_, region) in COUNTRY_REGIONS {
            assert!(REGIONS.contains(region), "{} missing from REGIONS", region);
        }
    }

    #[test]
    fn test_sdg_catalog_numbers() {
        let sdgs = SdgCatalog::list();
        assert_eq!(sdgs.len(), 17);
        assert_eq!(sdgs[0].number, 1);
        assert_eq!(sdgs[16].number, 17);
    }
}
