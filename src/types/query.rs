//! Discovery Query Types
//!
//! `FilterSpec`, `SortSpec` and the combined `QueryState` are plain immutable values.
//! The discovery session replaces them wholesale on every user action; the engines
//! never mutate them.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 멀티 선택 패싯 + 범위 + tri-state boolean 필터
///
/// 빈 집합 = 제약 없음 ("아무것도 매치 안 함"이 아님).
/// `FilterSpec::default()`는 항등 필터.
///
/// 역직렬화는 관대함: 형식이 잘못된 값은 요청 전체를 거부하지 않고
/// "없음" 또는 "아무것도 매치 안 함"으로 처리.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    #[serde(deserialize_with = "lenient_strings")]
    pub sectors: BTreeSet<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub countries: BTreeSet<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub regions: BTreeSet<String>,
    /// 원문 토큰 그대로 보관. 알 수 없는 값은 필터링 시 아무것도 매치하지 않음.
    #[serde(deserialize_with = "lenient_strings")]
    pub funding_stages: BTreeSet<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub investment_models: BTreeSet<String>,
    /// 정수가 아닌 항목은 0으로 보관 (SDG는 1~17이라 어떤 프로젝트와도 매치 안 됨)
    #[serde(deserialize_with = "lenient_sdgs")]
    pub sdgs: BTreeSet<u32>,
    pub funding_range: FundingRange,
    #[serde(deserialize_with = "lenient_score")]
    pub quality_score_min: Option<u8>,
    #[serde(deserialize_with = "lenient_flag")]
    pub has_video: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub has_pilots: Option<bool>,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterSpec::default()
    }
}

/// 펀딩 금액 범위. 어느 쪽이든 없으면 그 방향은 무제한.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingRange {
    #[serde(deserialize_with = "lenient_min")]
    pub min: Option<u64>,
    #[serde(deserialize_with = "lenient_max")]
    pub max: Option<u64>,
}

impl FundingRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: u64) -> bool {
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// 소수 입력을 정수 경계로 바꿀 방향
///
/// 하한은 올림, 상한은 내림: 경계 밖 금액이 범위에 들어오지 않게 함
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Up,
    Down,
}

/// 범위 입력 파싱
///
/// 숫자가 아닌 값은 0이 아니라 "없음"으로 처리. 음수도 없음.
/// `"50,000"`, `" 1_000 "` 같은 폼 입력은 구분자를 제거하고 허용.
pub fn parse_bound(raw: &Value, rounding: Rounding) -> Option<u64> {
    match raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(|value| non_negative(value, rounding))),
        Value::String(s) => parse_bound_str(s, rounding),
        _ => None,
    }
}

pub fn parse_bound_str(raw: &str, rounding: Rounding) -> Option<u64> {
    let cleaned = raw.trim().replace([',', '_'], "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .and_then(|value| non_negative(value, rounding))
    })
}

fn non_negative(value: f64, rounding: Rounding) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let rounded = match rounding {
        Rounding::Up => value.ceil(),
        Rounding::Down => value.floor(),
    };
    Some(rounded as u64)
}

fn lenient_min<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|value| parse_bound(value, Rounding::Up)))
}

fn lenient_max<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|value| parse_bound(value, Rounding::Down)))
}

/// 100을 넘는 점수는 100으로 클램프
pub(crate) fn parse_score(raw: &Value, rounding: Rounding) -> Option<u8> {
    parse_bound(raw, rounding).map(|score| score.min(100) as u8)
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    // 하한이므로 올림
    Ok(raw.as_ref().and_then(|value| parse_score(value, Rounding::Up)))
}

/// 문자열 배열. 단일 문자열은 한 항목으로, 다른 스칼라는 JSON 텍스트로 보관.
fn lenient_strings<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::String(single)) => vec![Value::String(single)],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}

fn lenient_sdgs<'de, D>(deserializer: D) -> Result<BTreeSet<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(single @ (Value::Number(_) | Value::String(_))) => vec![single],
        _ => Vec::new(),
    };
    Ok(items.iter().map(sdg_number).collect())
}

fn sdg_number(raw: &Value) -> u32 {
    let parsed = match raw {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.unwrap_or(0)
}

/// tri-state boolean. `"true"` / `"false"` 문자열도 허용, 그 밖의 값은 "상관없음".
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Ok(flag)
}

/// 알 수 없는 정렬 값은 기본값으로
fn lenient_sort_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => serde_json::from_value(Value::String(s.trim().to_lowercase())).ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// 정렬 키
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Recent,
    Popular,
    Quality,
    Funding,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// 기본값: recent / asc (최신순)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    #[serde(deserialize_with = "lenient_sort_value")]
    pub key: SortKey,
    #[serde(deserialize_with = "lenient_sort_value")]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// 활성 검색 상태 (검색어 + 필터 + 정렬)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryState {
    pub query: String,
    pub filter: FilterSpec,
    pub sort: SortSpec,
}
