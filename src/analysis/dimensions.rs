//! 职位、地域、经验、学历、公司几个维度的分布统计

use crate::analysis::engine::AnalysisConfig;
use crate::analysis::ranked::Ranked;
use crate::analysis::report::{
    CompanyAnalysis, EducationAnalysis, ExperienceAnalysis, LocationAnalysis, PositionAnalysis,
};
use crate::analysis::salary::salary_snapshot;
use crate::normalize::{DerivedColumn, ExperienceBand, NormalizedBatch, NormalizedJobRecord};
use std::collections::HashMap;

pub fn count_by<'a, I, F>(records: I, key: F) -> HashMap<String, usize>
where
    I: IntoIterator<Item = &'a NormalizedJobRecord>,
    F: Fn(&'a NormalizedJobRecord) -> Option<&'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in records {
        if let Some(k) = key(r) {
            *counts.entry(k.to_string()).or_default() += 1;
        }
    }
    counts
}

fn top_positions<'a, I>(records: I, limit: usize) -> Ranked<usize>
where
    I: IntoIterator<Item = &'a NormalizedJobRecord>,
{
    Ranked::from_counts(
        count_by(records, |r| Some(r.position_normalized.as_str())),
        Some(limit),
    )
}

/// 对分布里的每个取值，统计该取值下的前 N 个职位；没有职位列时为空
fn positions_per_key<F>(
    batch: &NormalizedBatch,
    distribution: &Ranked<usize>,
    limit: usize,
    key: F,
) -> Ranked<Ranked<usize>>
where
    F: Fn(&NormalizedJobRecord) -> Option<&str>,
{
    if !batch.has(DerivedColumn::PositionNormalized) {
        return Ranked::new();
    }
    distribution
        .keys()
        .map(|k| {
            let rows = batch.records.iter().filter(|r| key(r) == Some(k));
            (k.to_string(), top_positions(rows, limit))
        })
        .collect()
}

pub fn analyze_positions(batch: &NormalizedBatch, config: &AnalysisConfig) -> PositionAnalysis {
    if !batch.has(DerivedColumn::PositionNormalized) {
        return PositionAnalysis::default();
    }
    let distribution = top_positions(&batch.records, config.top_positions);

    let mut position_skills = Ranked::new();
    if batch.has(DerivedColumn::Skills) {
        for position in distribution.keys() {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for r in batch
                .records
                .iter()
                .filter(|r| r.position_normalized == position)
            {
                for skill in &r.skills {
                    *counts.entry(skill.clone()).or_default() += 1;
                }
            }
            position_skills.push(
                position,
                Ranked::from_counts(counts, Some(config.skills_per_position)),
            );
        }
    }

    PositionAnalysis {
        position_distribution: Some(distribution),
        position_skills: Some(position_skills),
    }
}

pub fn analyze_locations(batch: &NormalizedBatch, config: &AnalysisConfig) -> LocationAnalysis {
    if !batch.has(DerivedColumn::City) {
        return LocationAnalysis::default();
    }
    let distribution = Ranked::from_counts(
        count_by(&batch.records, |r| Some(r.city.as_str())),
        Some(config.top_cities),
    );
    let city_positions = positions_per_key(
        batch,
        &distribution,
        config.positions_per_group,
        |r| Some(r.city.as_str()),
    );
    LocationAnalysis {
        city_distribution: Some(distribution),
        city_positions: Some(city_positions),
    }
}

fn band_of(record: &NormalizedJobRecord) -> Option<&'static str> {
    record
        .exp_min
        .and_then(ExperienceBand::from_years)
        .map(ExperienceBand::label)
}

pub fn analyze_experience(batch: &NormalizedBatch, config: &AnalysisConfig) -> ExperienceAnalysis {
    if !batch.has(DerivedColumn::Experience) {
        return ExperienceAnalysis::default();
    }
    let counts = count_by(&batch.records, |r| band_of(r));
    // 频次降序，同频按分档顺序
    let mut entries: Vec<(ExperienceBand, usize)> = ExperienceBand::ALL
        .iter()
        .filter_map(|b| counts.get(b.label()).map(|n| (*b, *n)))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    let distribution: Ranked<usize> = entries
        .into_iter()
        .map(|(b, n)| (b.label().to_string(), n))
        .collect();

    let experience_positions =
        positions_per_key(batch, &distribution, config.positions_per_group, |r| {
            band_of(r)
        });
    ExperienceAnalysis {
        experience_distribution: Some(distribution),
        experience_positions: Some(experience_positions),
    }
}

pub fn analyze_education(batch: &NormalizedBatch, config: &AnalysisConfig) -> EducationAnalysis {
    if !batch.has(DerivedColumn::EducationLevel) {
        return EducationAnalysis::default();
    }
    let distribution = Ranked::from_counts(
        count_by(&batch.records, |r| Some(r.education_level.as_str())),
        None,
    );
    let education_positions = positions_per_key(
        batch,
        &distribution,
        config.positions_per_group,
        |r| Some(r.education_level.as_str()),
    );

    let mut education_salary = Ranked::new();
    if batch.has(DerivedColumn::Salary) {
        for level in distribution.keys() {
            let rows = batch
                .records
                .iter()
                .filter(|r| r.education_level.as_str() == level);
            education_salary.push(level, salary_snapshot(rows));
        }
    }

    EducationAnalysis {
        education_distribution: Some(distribution),
        education_positions: Some(education_positions),
        education_salary: Some(education_salary),
    }
}

pub fn analyze_companies(batch: &NormalizedBatch, config: &AnalysisConfig) -> CompanyAnalysis {
    if !batch.has(DerivedColumn::Company) {
        return CompanyAnalysis::default();
    }
    let top_companies = Ranked::from_counts(
        count_by(&batch.records, |r| Some(r.company.as_str())),
        Some(config.top_companies),
    );

    let company_size = if batch.has(DerivedColumn::CompanySize) {
        Ranked::from_counts(
            count_by(&batch.records, |r| r.company_size.as_deref()),
            None,
        )
    } else {
        Ranked::new()
    };

    let company_industry = if batch.has(DerivedColumn::Industry) {
        Ranked::from_counts(
            count_by(&batch.records, |r| r.industry.as_deref()),
            Some(config.top_industries),
        )
    } else {
        Ranked::new()
    };

    CompanyAnalysis {
        top_companies: Some(top_companies),
        company_size: Some(company_size),
        company_industry: Some(company_industry),
    }
}
