use crate::analysis::stats;
use crate::normalize::education::normalize_education;
use crate::normalize::experience::parse_experience;
use crate::normalize::location::parse_location;
use crate::normalize::model::{
    Column, DerivedColumn, NormalizedBatch, NormalizedJobRecord, RawBatch, RawJobRecord,
};
use crate::normalize::position::normalize_position;
use crate::normalize::salary::{parse_salary, SalaryUnit};
use crate::normalize::skills::extract_skills;
use crate::normalize::vocabulary::Vocabulary;
use chrono::{DateTime, Local};
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

pub const UNKNOWN: &str = "未知";

/// 单次清洗的解析统计，仅用于日志和运行摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeStats {
    pub records: usize,
    pub salary_parsed: usize,
    pub experience_parsed: usize,
    pub education_known: usize,
    pub with_skills: usize,
}

pub struct RecordNormalizer {
    vocab: Arc<Vocabulary>,
}

impl RecordNormalizer {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn normalize(&self, batch: &RawBatch) -> (NormalizedBatch, NormalizeStats) {
        self.normalize_at(batch, Local::now())
    }

    /// 一条输入对应一条输出，顺序不变，不丢行
    pub fn normalize_at(
        &self,
        batch: &RawBatch,
        processed_at: DateTime<Local>,
    ) -> (NormalizedBatch, NormalizeStats) {
        // 1. 缺失值填充（先于字段解析）
        let imputed = impute_missing(batch);

        // 2. 逐列解析
        let columns = derived_columns(&batch.columns);
        let mut stats = NormalizeStats {
            records: imputed.len(),
            ..Default::default()
        };
        let records: Vec<NormalizedJobRecord> = imputed
            .iter()
            .map(|raw| self.normalize_record(raw, &batch.columns, processed_at, &mut stats))
            .collect();

        info!(
            "清洗完成: {} 条, 薪资解析 {}, 经验解析 {}, 学历识别 {}, 含技能 {}",
            stats.records,
            stats.salary_parsed,
            stats.experience_parsed,
            stats.education_known,
            stats.with_skills
        );
        debug!("派生列: {:?}", columns);

        (NormalizedBatch { columns, records }, stats)
    }

    fn normalize_record(
        &self,
        raw: &RawJobRecord,
        present: &BTreeSet<Column>,
        processed_at: DateTime<Local>,
        stats: &mut NormalizeStats,
    ) -> NormalizedJobRecord {
        let vocab = self.vocab.as_ref();
        let mut out = NormalizedJobRecord::empty(processed_at);

        if present.contains(&Column::Position) {
            let position = raw.position.as_deref().unwrap_or(UNKNOWN);
            out.position_normalized = normalize_position(position, vocab);
            out.position = raw.position.clone();
        }

        if present.contains(&Column::Company) {
            out.company = raw.company.clone().unwrap_or_else(|| UNKNOWN.to_string());
        }

        if present.contains(&Column::Salary) {
            // 薪资文本列存在时以解析结果为准，预提取的数值列被覆盖
            if let Some(range) = raw.salary.as_deref().and_then(parse_salary) {
                out.salary_min = Some(range.min);
                out.salary_max = Some(range.max);
                out.salary_unit = Some(range.unit);
            }
        } else {
            out.salary_min = raw.salary_min;
            out.salary_max = raw.salary_max;
            if out.salary_min.is_some() || out.salary_max.is_some() {
                out.salary_unit = Some(SalaryUnit::Monthly);
            }
        }
        out.salary_avg = match (out.salary_min, out.salary_max) {
            (Some(lo), Some(hi)) => Some((lo + hi) / 2.0),
            _ => None,
        };
        if out.salary_avg.is_some() {
            stats.salary_parsed += 1;
        }

        if present.contains(&Column::Experience) {
            let exp = parse_experience(raw.experience.as_deref().unwrap_or(""));
            out.exp_min = exp.min;
            out.exp_max = exp.max;
            if !exp.is_unknown() {
                stats.experience_parsed += 1;
            }
        }

        if present.contains(&Column::Education) {
            let edu = raw.education.as_deref().unwrap_or(UNKNOWN);
            out.education_level = normalize_education(edu, vocab);
            if out.education_level.tier() > 0 {
                stats.education_known += 1;
            }
        }

        if present.contains(&Column::Location) {
            let loc = parse_location(raw.location.as_deref().unwrap_or(""));
            out.city = loc.city;
            out.district = loc.district;
        }

        if present.contains(&Column::Description) {
            out.skills = extract_skills(raw.description.as_deref().unwrap_or(""), vocab);
            if !out.skills.is_empty() {
                stats.with_skills += 1;
            }
        }

        out.company_size = raw.company_size.clone();
        out.industry = raw.industry.clone();
        out
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(Vocabulary::shared())
    }
}

/// 缺失值填充：数值列取中位数，类别列填"未知"，描述填空串。只处理输入里存在的列。
pub fn impute_missing(batch: &RawBatch) -> Vec<RawJobRecord> {
    let min_median = if batch.has(Column::SalaryMin) {
        column_median(&batch.records, |r| r.salary_min)
    } else {
        None
    };
    let max_median = if batch.has(Column::SalaryMax) {
        column_median(&batch.records, |r| r.salary_max)
    } else {
        None
    };

    let fill = |value: &Option<String>, col: Column, token: &str| -> Option<String> {
        match value {
            Some(v) => Some(v.clone()),
            None if batch.has(col) => Some(token.to_string()),
            None => None,
        }
    };

    batch
        .records
        .iter()
        .map(|r| RawJobRecord {
            position: fill(&r.position, Column::Position, UNKNOWN),
            company: fill(&r.company, Column::Company, UNKNOWN),
            education: fill(&r.education, Column::Education, UNKNOWN),
            location: fill(&r.location, Column::Location, UNKNOWN),
            description: fill(&r.description, Column::Description, ""),
            salary_min: r.salary_min.or(min_median),
            salary_max: r.salary_max.or(max_median),
            salary: r.salary.clone(),
            experience: r.experience.clone(),
            company_size: r.company_size.clone(),
            industry: r.industry.clone(),
        })
        .collect()
}

fn column_median<F>(records: &[RawJobRecord], get: F) -> Option<f64>
where
    F: Fn(&RawJobRecord) -> Option<f64>,
{
    let values: Vec<f64> = records
        .iter()
        .filter_map(&get)
        .filter(|v| v.is_finite())
        .collect();
    stats::median(&values)
}

fn derived_columns(present: &BTreeSet<Column>) -> BTreeSet<DerivedColumn> {
    let mut out = BTreeSet::new();
    for col in present {
        let derived = match col {
            Column::Position => DerivedColumn::PositionNormalized,
            Column::Company => DerivedColumn::Company,
            Column::Salary => DerivedColumn::Salary,
            Column::SalaryMin | Column::SalaryMax => {
                if present.contains(&Column::SalaryMin) && present.contains(&Column::SalaryMax) {
                    DerivedColumn::Salary
                } else {
                    continue;
                }
            }
            Column::Experience => DerivedColumn::Experience,
            Column::Education => DerivedColumn::EducationLevel,
            Column::Location => DerivedColumn::City,
            Column::Description => DerivedColumn::Skills,
            Column::CompanySize => DerivedColumn::CompanySize,
            Column::Industry => DerivedColumn::Industry,
        };
        out.insert(derived);
    }
    out
}
