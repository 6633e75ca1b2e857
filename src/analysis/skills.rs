use crate::analysis::engine::AnalysisConfig;
use crate::analysis::ranked::Ranked;
use crate::analysis::report::SkillAnalysis;
use crate::analysis::salary::salary_snapshot;
use crate::normalize::{DerivedColumn, NormalizedBatch};
use std::collections::HashMap;

pub fn analyze_skills(batch: &NormalizedBatch, config: &AnalysisConfig) -> SkillAnalysis {
    if !batch.has(DerivedColumn::Skills) {
        return SkillAnalysis::default();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in &batch.records {
        for skill in &r.skills {
            *counts.entry(skill.clone()).or_default() += 1;
        }
    }
    let top_skills = Ranked::from_counts(counts, Some(config.top_skills));

    // 只对出现次数足够多的技能计算薪资
    let mut skill_salary = Ranked::new();
    if batch.has(DerivedColumn::Salary) {
        for (skill, count) in top_skills.iter() {
            if *count < config.min_skill_samples {
                continue;
            }
            let rows = batch.records.iter().filter(|r| r.has_skill(skill));
            skill_salary.push(skill, salary_snapshot(rows));
        }
    }

    SkillAnalysis {
        top_skills: Some(top_skills),
        skill_salary: Some(skill_salary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedJobRecord;
    use chrono::Local;

    fn job(skills: &[&str], salary: Option<f64>) -> NormalizedJobRecord {
        let mut r = NormalizedJobRecord::empty(Local::now());
        r.skills = skills.iter().map(|s| s.to_string()).collect();
        r.salary_avg = salary;
        r
    }

    fn batch(records: Vec<NormalizedJobRecord>, with_salary: bool) -> NormalizedBatch {
        let mut columns = vec![DerivedColumn::Skills];
        if with_salary {
            columns.push(DerivedColumn::Salary);
        }
        NormalizedBatch {
            columns: columns.into_iter().collect(),
            records,
        }
    }

    #[test]
    fn rare_skills_have_no_salary_entry() {
        let mut records = Vec::new();
        for _ in 0..10 {
            records.push(job(&["java", "mysql"], Some(20000.0)));
        }
        for _ in 0..9 {
            records.push(job(&["go"], Some(30000.0)));
        }
        let out = analyze_skills(&batch(records, true), &AnalysisConfig::default());

        let top = out.top_skills.unwrap();
        assert_eq!(top.keys().collect::<Vec<_>>(), vec!["java", "mysql", "go"]);
        let salary = out.skill_salary.unwrap();
        assert!(salary.get("go").is_none());
        let java = salary.get("java").unwrap();
        assert_eq!(java.count, 10);
        assert_eq!(java.mean, Some(20000.0));
    }

    #[test]
    fn skill_salary_empty_without_salary_column() {
        let records = (0..12).map(|_| job(&["python"], None)).collect();
        let out = analyze_skills(&batch(records, false), &AnalysisConfig::default());
        assert_eq!(out.top_skills.unwrap().get("python"), Some(&12));
        assert!(out.skill_salary.unwrap().is_empty());
    }

    #[test]
    fn missing_skills_column_is_empty() {
        let b = NormalizedBatch::default();
        let out = analyze_skills(&b, &AnalysisConfig::default());
        assert_eq!(serde_json::to_value(out).unwrap(), serde_json::json!({}));
    }
}
