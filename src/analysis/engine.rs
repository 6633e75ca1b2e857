use crate::analysis::dimensions::{
    analyze_companies, analyze_education, analyze_experience, analyze_locations,
    analyze_positions,
};
use crate::analysis::report::{AggregateReport, BasicStats};
use crate::analysis::salary::analyze_salary;
use crate::analysis::skills::analyze_skills;
use crate::analysis::stats;
use crate::normalize::{DerivedColumn, NormalizedBatch};
use chrono::{DateTime, Local};
use log::info;
use std::collections::HashSet;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 各分布的截取数量和最小样本数
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub top_positions: usize,
    pub skills_per_position: usize,
    pub top_cities: usize,
    pub positions_per_group: usize,
    pub top_skills: usize,
    pub top_companies: usize,
    pub top_industries: usize,
    pub min_city_samples: usize,
    pub min_skill_samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_positions: 20,
            skills_per_position: 10,
            top_cities: 20,
            positions_per_group: 5,
            top_skills: 50,
            top_companies: 50,
            top_industries: 20,
            min_city_samples: 10,
            min_skill_samples: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    config: AnalysisConfig,
}

impl AggregationEngine {
    pub fn analyze(&self, batch: &NormalizedBatch) -> AggregateReport {
        self.analyze_at(batch, Local::now())
    }

    /// 相同输入得到相同报告，只有 timestamp 不同
    pub fn analyze_at(&self, batch: &NormalizedBatch, now: DateTime<Local>) -> AggregateReport {
        info!("开始聚合分析: {} 条记录", batch.len());
        let cfg = &self.config;
        let report = AggregateReport {
            basic_stats: basic_stats(batch),
            salary_analysis: analyze_salary(batch, cfg),
            position_analysis: analyze_positions(batch, cfg),
            skill_analysis: analyze_skills(batch, cfg),
            location_analysis: analyze_locations(batch, cfg),
            experience_analysis: analyze_experience(batch, cfg),
            education_analysis: analyze_education(batch, cfg),
            company_analysis: analyze_companies(batch, cfg),
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            llm_analysis: None,
        };
        info!(
            "聚合分析完成: 职位 {} 种, 城市 {} 个, 平均薪资 {:?}",
            report.basic_stats.unique_positions,
            report.basic_stats.unique_cities,
            report.basic_stats.avg_salary
        );
        report
    }
}

fn distinct<'a, I: Iterator<Item = &'a str>>(values: I) -> usize {
    values.collect::<HashSet<_>>().len()
}

pub fn basic_stats(batch: &NormalizedBatch) -> BasicStats {
    let records = &batch.records;
    let mut out = BasicStats {
        total_jobs: records.len(),
        ..Default::default()
    };
    if batch.has(DerivedColumn::PositionNormalized) {
        out.unique_positions = distinct(records.iter().map(|r| r.position_normalized.as_str()));
    }
    if batch.has(DerivedColumn::Company) {
        out.unique_companies = distinct(records.iter().map(|r| r.company.as_str()));
    }
    if batch.has(DerivedColumn::City) {
        out.unique_cities = distinct(records.iter().map(|r| r.city.as_str()));
    }
    if batch.has(DerivedColumn::Salary) {
        let salaries: Vec<f64> = records.iter().filter_map(|r| r.salary_avg).collect();
        out.avg_salary = stats::mean(&salaries);
        out.median_salary = stats::median(&salaries);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Column, RawBatch, RawJobRecord, RecordNormalizer};
    use chrono::TimeZone;

    fn raw(position: &str, salary: &str, exp: &str, edu: &str, loc: &str, desc: &str) -> RawJobRecord {
        RawJobRecord {
            position: Some(position.to_string()),
            company: Some(format!("{}公司", loc)),
            salary: Some(salary.to_string()),
            experience: Some(exp.to_string()),
            education: Some(edu.to_string()),
            location: Some(loc.to_string()),
            description: Some(desc.to_string()),
            ..Default::default()
        }
    }

    fn sample_batch() -> NormalizedBatch {
        let mut records = Vec::new();
        for i in 0..12 {
            records.push(raw(
                "Java开发",
                if i % 2 == 0 { "15k-25k" } else { "20k-30k" },
                "3-5年",
                "本科",
                "上海-浦东新区",
                "熟悉java、spring、mysql",
            ));
        }
        for _ in 0..5 {
            records.push(raw("Python后端", "面议", "应届毕业生", "硕士", "北京", "python django"));
        }
        let batch = RawBatch::from_records(records);
        let at = Local.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        RecordNormalizer::default().normalize_at(&batch, at).0
    }

    #[test]
    fn identical_input_gives_identical_report() {
        let batch = sample_batch();
        let engine = AggregationEngine::default();
        let at = Local.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let a = serde_json::to_string(&engine.analyze_at(&batch, at)).unwrap();
        let b = serde_json::to_string(&engine.analyze_at(&batch, at)).unwrap();
        assert_eq!(a, b);

        let later = engine.analyze(&batch);
        let mut first = engine.analyze_at(&batch, at);
        first.timestamp = later.timestamp.clone();
        assert_eq!(first, later);
    }

    #[test]
    fn report_covers_every_section() {
        let batch = sample_batch();
        let at = Local.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let report = AggregationEngine::default().analyze_at(&batch, at);

        assert_eq!(report.timestamp, "2024-05-02 09:30:00");
        assert_eq!(report.basic_stats.total_jobs, 17);
        assert_eq!(report.basic_stats.unique_positions, 2);
        assert_eq!(report.basic_stats.unique_cities, 2);
        // 15k-25k 与 20k-30k 各半
        assert_eq!(report.basic_stats.avg_salary, Some(22500.0));

        let by_city = report.salary_analysis.by_city.as_ref().unwrap();
        assert_eq!(by_city.keys().collect::<Vec<_>>(), vec!["上海"]);

        let skills = report.skill_analysis.skill_salary.as_ref().unwrap();
        assert!(skills.get("java").is_some());
        assert!(skills.get("python").is_none());

        let exp = report.experience_analysis.experience_distribution.as_ref().unwrap();
        assert_eq!(exp.keys().collect::<Vec<_>>(), vec!["3-5年", "不限"]);

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("llm_analysis").is_none());
        assert!(!value.to_string().contains("NaN"));
    }

    #[test]
    fn missing_columns_degrade_to_empty_objects() {
        let records = vec![RawJobRecord {
            position: Some("前端开发".to_string()),
            ..Default::default()
        }];
        let mut columns = std::collections::BTreeSet::new();
        columns.insert(Column::Position);
        let batch = RecordNormalizer::default()
            .normalize(&RawBatch::new(records, columns))
            .0;
        let report = AggregationEngine::default().analyze(&batch);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["salary_analysis"], serde_json::json!({}));
        assert_eq!(value["location_analysis"], serde_json::json!({}));
        assert_eq!(value["company_analysis"], serde_json::json!({}));
        assert_eq!(value["basic_stats"]["avg_salary"], serde_json::Value::Null);
        assert_eq!(
            value["position_analysis"]["position_distribution"]["前端开发工程师"],
            serde_json::json!(1)
        );
        assert_eq!(value["position_analysis"]["position_skills"], serde_json::json!({}));
    }
}
