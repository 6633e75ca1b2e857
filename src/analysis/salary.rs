use crate::analysis::engine::AnalysisConfig;
use crate::analysis::ranked::Ranked;
use crate::analysis::report::{GroupStats, Quantiles, SalaryAnalysis, SalarySnapshot};
use crate::analysis::stats;
use crate::normalize::{DerivedColumn, ExperienceBand, NormalizedBatch, NormalizedJobRecord};
use std::collections::HashMap;

/// 有效薪资：存在且大于 0
pub fn positive_salary(record: &NormalizedJobRecord) -> Option<f64> {
    record.salary_avg.filter(|v| *v > 0.0 && v.is_finite())
}

pub fn group_stats(values: &[f64]) -> GroupStats {
    GroupStats {
        mean: stats::mean(values),
        median: stats::median(values),
        std: stats::std_dev(values),
        count: values.len(),
    }
}

/// 一组记录的薪资均值/中位数，`count` 为记录数（含无薪资的记录）
pub fn salary_snapshot<'a, I>(records: I) -> SalarySnapshot
where
    I: IntoIterator<Item = &'a NormalizedJobRecord>,
{
    let mut count = 0;
    let mut values = Vec::new();
    for r in records {
        count += 1;
        if let Some(v) = positive_salary(r) {
            values.push(v);
        }
    }
    SalarySnapshot {
        mean: stats::mean(&values),
        median: stats::median(&values),
        count,
    }
}

fn grouped<F>(rows: &[(&NormalizedJobRecord, f64)], key: F) -> HashMap<String, Vec<f64>>
where
    F: Fn(&NormalizedJobRecord) -> Option<String>,
{
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for (r, v) in rows {
        if let Some(k) = key(r) {
            groups.entry(k).or_default().push(*v);
        }
    }
    groups
}

/// 均值降序，均值相同按 key 字典序
fn by_mean_desc(groups: HashMap<String, Vec<f64>>) -> Ranked<GroupStats> {
    let entries = groups
        .into_iter()
        .map(|(k, values)| (k, group_stats(&values)))
        .collect();
    Ranked::sorted_by(entries, |a: &GroupStats, b: &GroupStats| {
        let a = a.mean.unwrap_or(f64::NEG_INFINITY);
        let b = b.mean.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    })
}

pub fn analyze_salary(batch: &NormalizedBatch, config: &AnalysisConfig) -> SalaryAnalysis {
    if !batch.has(DerivedColumn::Salary) {
        return SalaryAnalysis::default();
    }

    let rows: Vec<(&NormalizedJobRecord, f64)> = batch
        .records
        .iter()
        .filter_map(|r| positive_salary(r).map(|v| (r, v)))
        .collect();
    let mut values: Vec<f64> = rows.iter().map(|(_, v)| *v).collect();
    values.sort_by(f64::total_cmp);

    let mut out = SalaryAnalysis {
        mean: stats::mean(&values),
        median: stats::quantile_sorted(&values, 0.5),
        min: stats::min(&values),
        max: stats::max(&values),
        std: stats::std_dev(&values),
        quantiles: Some(Quantiles {
            p25: stats::quantile_sorted(&values, 0.25),
            p50: stats::quantile_sorted(&values, 0.5),
            p75: stats::quantile_sorted(&values, 0.75),
            p90: stats::quantile_sorted(&values, 0.9),
        }),
        ..Default::default()
    };

    if batch.has(DerivedColumn::PositionNormalized) {
        let groups = grouped(&rows, |r| Some(r.position_normalized.clone()));
        out.by_position = Some(by_mean_desc(groups));
    }

    if batch.has(DerivedColumn::City) {
        // 样本太少的城市不参与比较
        let mut groups = grouped(&rows, |r| Some(r.city.clone()));
        groups.retain(|_, v| v.len() >= config.min_city_samples);
        out.by_city = Some(by_mean_desc(groups));
    }

    if batch.has(DerivedColumn::Experience) {
        let mut groups = grouped(&rows, |r| {
            r.exp_min
                .and_then(ExperienceBand::from_years)
                .map(|b| b.label().to_string())
        });
        let by_band = ExperienceBand::ALL
            .iter()
            .filter_map(|band| {
                groups
                    .remove(band.label())
                    .map(|values| (band.label().to_string(), group_stats(&values)))
            })
            .collect();
        out.by_experience = Some(by_band);
    }

    if batch.has(DerivedColumn::EducationLevel) {
        let groups = grouped(&rows, |r| Some(r.education_level.as_str().to_string()));
        out.by_education = Some(by_mean_desc(groups));
    }

    out
}
