//! Industry insight schema and its per-field defaults.
//!
//! | field             | default  |
//! |-------------------|----------|
//! | salaryRanges      | `[]`     |
//! | growthRate        | `0`      |
//! | demandLevel       | `Medium` |
//! | topSkills         | `[]`     |
//! | marketOutlook     | `Neutral`|
//! | keyTrends         | `[]`     |
//! | recommendedSkills | `[]`     |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extraction::fields::{label_or_default, list_of, number_or, string_list};
use crate::extraction::payload::parse_json_object;
use crate::extraction::{ExtractionError, StructuredReply};
use crate::models::insight::{IndustryInsightRow, SalaryRange};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl DemandLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DemandLevel::High => "High",
            DemandLevel::Medium => "Medium",
            DemandLevel::Low => "Low",
        }
    }
}

impl FromStr for DemandLevel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(DemandLevel::High),
            "medium" => Ok(DemandLevel::Medium),
            "low" => Ok(DemandLevel::Low),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketOutlook {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl MarketOutlook {
    pub fn as_str(self) -> &'static str {
        match self {
            MarketOutlook::Positive => "Positive",
            MarketOutlook::Neutral => "Neutral",
            MarketOutlook::Negative => "Negative",
        }
    }
}

impl FromStr for MarketOutlook {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(MarketOutlook::Positive),
            "neutral" => Ok(MarketOutlook::Neutral),
            "negative" => Ok(MarketOutlook::Negative),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

impl fmt::Display for MarketOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

/// The structured result of an insight generation. Always fully populated.
///
/// `Default` is also the fallback template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsightData {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
}

impl IndustryInsightData {
    /// Takes each field when present and well-typed, otherwise its default.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            salary_ranges: list_of(obj, "salaryRanges"),
            growth_rate: number_or(obj, "growthRate", 0.0),
            demand_level: label_or_default(obj, "demandLevel"),
            top_skills: string_list(obj, "topSkills"),
            market_outlook: label_or_default(obj, "marketOutlook"),
            key_trends: string_list(obj, "keyTrends"),
            recommended_skills: string_list(obj, "recommendedSkills"),
        }
    }
}

impl StructuredReply for IndustryInsightData {
    fn from_reply(raw: &str) -> Result<Self, ExtractionError> {
        Ok(Self::from_object(&parse_json_object(raw)?))
    }
}

impl From<&IndustryInsightRow> for IndustryInsightData {
    fn from(row: &IndustryInsightRow) -> Self {
        Self {
            salary_ranges: row.salary_ranges.0.clone(),
            growth_rate: row.growth_rate,
            demand_level: row.demand_level.parse().unwrap_or_default(),
            top_skills: row.top_skills.clone(),
            market_outlook: row.market_outlook.parse().unwrap_or_default(),
            key_trends: row.key_trends.clone(),
            recommended_skills: row.recommended_skills.clone(),
        }
    }
}
