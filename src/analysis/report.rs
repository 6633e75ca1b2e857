//! 分析报告结构，对应快照 JSON 的 schema。
//!
//! 各子分析在所需列缺失时为空对象 `{}`，读取方应把缺失的键当作"无数据"。

use crate::analysis::ranked::Ranked;
use crate::insight::LlmAnalysis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub basic_stats: BasicStats,
    pub salary_analysis: SalaryAnalysis,
    pub position_analysis: PositionAnalysis,
    pub skill_analysis: SkillAnalysis,
    pub location_analysis: LocationAnalysis,
    pub experience_analysis: ExperienceAnalysis,
    pub education_analysis: EducationAnalysis,
    pub company_analysis: CompanyAnalysis,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_analysis: Option<LlmAnalysis>,
}

impl AggregateReport {
    /// 合并大模型分析，返回新报告，原报告不变
    pub fn with_llm_analysis(&self, analysis: LlmAnalysis) -> Self {
        Self {
            llm_analysis: Some(analysis),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_jobs: usize,
    pub unique_positions: usize,
    pub unique_companies: usize,
    pub unique_cities: usize,
    pub avg_salary: Option<f64>,
    pub median_salary: Option<f64>,
}

/// 分组薪资统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub count: usize,
}

/// 某个取值下的薪资均值/中位数与出现次数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySnapshot {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantiles {
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    #[serde(rename = "90%")]
    pub p90: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalaryAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantiles: Option<Quantiles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_position: Option<Ranked<GroupStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_city: Option<Ranked<GroupStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_experience: Option<Ranked<GroupStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_education: Option<Ranked<GroupStats>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_distribution: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_skills: Option<Ranked<Ranked<usize>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_skills: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_salary: Option<Ranked<SalarySnapshot>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_distribution: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_positions: Option<Ranked<Ranked<usize>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_distribution: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_positions: Option<Ranked<Ranked<usize>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_distribution: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_positions: Option<Ranked<Ranked<usize>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_salary: Option<Ranked<SalarySnapshot>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_companies: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<Ranked<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_industry: Option<Ranked<usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sub_analyses_serialize_as_empty_objects() {
        let v = serde_json::to_value(SalaryAnalysis::default()).unwrap();
        assert_eq!(v, serde_json::json!({}));
        let v = serde_json::to_value(CompanyAnalysis::default()).unwrap();
        assert_eq!(v, serde_json::json!({}));
    }

    #[test]
    fn unknown_numbers_are_null() {
        let g = GroupStats {
            mean: Some(1.0),
            median: Some(1.0),
            std: None,
            count: 1,
        };
        let s = serde_json::to_string(&g).unwrap();
        assert_eq!(s, r#"{"mean":1.0,"median":1.0,"std":null,"count":1}"#);
        assert!(!s.contains("NaN"));
    }

    #[test]
    fn quantile_keys_use_percent_labels() {
        let q = Quantiles {
            p25: Some(1.0),
            p50: Some(2.0),
            p75: Some(3.0),
            p90: None,
        };
        let v = serde_json::to_value(q).unwrap();
        assert_eq!(v["25%"], serde_json::json!(1.0));
        assert!(v["90%"].is_null());
    }
}
