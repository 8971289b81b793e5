//! Dashboard view model.
//!
//! Pure display shaping over a stored insight. Empty sections are filled
//! with static placeholder content so the dashboard never renders blank.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::insights::schema::{DemandLevel, IndustryInsightData};
use crate::models::insight::IndustryInsightRow;

const UNKNOWN_ROLE: &str = "Unknown Role";

/// (role, min, median, max) in thousands.
const DEFAULT_SALARIES: [(&str, f64, f64, f64); 6] = [
    ("Software Engineer", 80.0, 120.0, 150.0),
    ("Data Scientist", 90.0, 135.0, 180.0),
    ("DevOps Engineer", 95.0, 130.0, 160.0),
    ("Frontend Developer", 70.0, 110.0, 145.0),
    ("Backend Developer", 85.0, 125.0, 155.0),
    ("Project Manager", 100.0, 140.0, 170.0),
];

const DEFAULT_TOP_SKILLS: [&str; 5] = ["Python", "Java", "JavaScript", "Cloud", "Agile"];

const DEFAULT_TRENDS: [&str; 3] = [
    "AI and Automation driving 60% of tech innovation.",
    "Remote work increasing demand for cloud infrastructure.",
    "Upskilling in data-driven roles becoming crucial.",
];

const DEFAULT_RECOMMENDED_SKILLS: [&str; 4] = [
    "TensorFlow / PyTorch",
    "AWS / Azure Cloud",
    "Data Visualization",
    "MLOps Fundamentals",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBar {
    pub role: String,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub industry: String,
    pub salary_data: Vec<SalaryBar>,
    /// Percent, clamped to 0–100.
    pub growth_rate: f64,
    pub demand_level: String,
    pub demand_bar_percent: u8,
    pub market_outlook: String,
    pub top_skills: Vec<String>,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
    pub days_until_update: i64,
}

pub fn demand_bar_percent(level: DemandLevel) -> u8 {
    match level {
        DemandLevel::High => 85,
        DemandLevel::Medium => 60,
        DemandLevel::Low => 40,
    }
}

fn or_defaults(items: &[String], defaults: &[&str]) -> Vec<String> {
    if items.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        items.to_vec()
    }
}

fn salary_bars(data: &IndustryInsightData) -> Vec<SalaryBar> {
    if data.salary_ranges.is_empty() {
        return DEFAULT_SALARIES
            .iter()
            .map(|&(role, min, median, max)| SalaryBar {
                role: role.to_string(),
                min,
                median,
                max,
            })
            .collect();
    }

    data.salary_ranges
        .iter()
        .map(|range| SalaryBar {
            role: if range.role.trim().is_empty() {
                UNKNOWN_ROLE.to_string()
            } else {
                range.role.clone()
            },
            min: range.min,
            median: range.median,
            max: range.max,
        })
        .collect()
}

pub fn build_dashboard(row: &IndustryInsightRow, now: DateTime<Utc>) -> DashboardView {
    let data = IndustryInsightData::from(row);

    let growth_rate = if data.growth_rate.is_finite() {
        data.growth_rate.clamp(0.0, 100.0)
    } else {
        0.0
    };

    DashboardView {
        industry: row.industry.clone(),
        salary_data: salary_bars(&data),
        growth_rate,
        demand_level: data.demand_level.to_string(),
        demand_bar_percent: demand_bar_percent(data.demand_level),
        market_outlook: data.market_outlook.to_string(),
        top_skills: or_defaults(&data.top_skills, &DEFAULT_TOP_SKILLS),
        key_trends: or_defaults(&data.key_trends, &DEFAULT_TRENDS),
        recommended_skills: or_defaults(&data.recommended_skills, &DEFAULT_RECOMMENDED_SKILLS),
        last_updated: row.last_updated,
        next_update: row.next_update,
        days_until_update: (row.next_update - now).num_days().max(0),
    }
}
