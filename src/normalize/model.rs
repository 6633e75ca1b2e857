use crate::normalize::education::EducationLevel;
use crate::normalize::salary::SalaryUnit;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 原始输入中的字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Position,
    Company,
    Salary,
    SalaryMin,
    SalaryMax,
    Experience,
    Education,
    Location,
    Description,
    CompanySize,
    Industry,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Position,
        Column::Company,
        Column::Salary,
        Column::SalaryMin,
        Column::SalaryMax,
        Column::Experience,
        Column::Education,
        Column::Location,
        Column::Description,
        Column::CompanySize,
        Column::Industry,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::Position => "position",
            Column::Company => "company",
            Column::Salary => "salary",
            Column::SalaryMin => "salary_min",
            Column::SalaryMax => "salary_max",
            Column::Experience => "experience",
            Column::Education => "education",
            Column::Location => "location",
            Column::Description => "description",
            Column::CompanySize => "company_size",
            Column::Industry => "industry",
        }
    }

    pub fn from_key(key: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawJobRecord {
    pub position: Option<String>,
    pub company: Option<String>,
    pub salary: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
}

#[cfg(test)]
impl RawJobRecord {
    fn has(&self, col: Column) -> bool {
        match col {
            Column::Position => self.position.is_some(),
            Column::Company => self.company.is_some(),
            Column::Salary => self.salary.is_some(),
            Column::SalaryMin => self.salary_min.is_some(),
            Column::SalaryMax => self.salary_max.is_some(),
            Column::Experience => self.experience.is_some(),
            Column::Education => self.education.is_some(),
            Column::Location => self.location.is_some(),
            Column::Description => self.description.is_some(),
            Column::CompanySize => self.company_size.is_some(),
            Column::Industry => self.industry.is_some(),
        }
    }
}

/// 一批原始记录，外加输入中出现过的列
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    pub records: Vec<RawJobRecord>,
    pub columns: BTreeSet<Column>,
}

impl RawBatch {
    pub fn new(records: Vec<RawJobRecord>, columns: BTreeSet<Column>) -> Self {
        Self { records, columns }
    }

    /// 没有显式列信息时，任何一条记录有值的列都视为存在
    #[cfg(test)]
    pub fn from_records(records: Vec<RawJobRecord>) -> Self {
        let columns = Column::ALL
            .iter()
            .copied()
            .filter(|c| records.iter().any(|r| r.has(*c)))
            .collect();
        Self { records, columns }
    }

    pub fn has(&self, col: Column) -> bool {
        self.columns.contains(&col)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 清洗后才有的派生列，聚合阶段按它判断某项分析能否进行
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedColumn {
    PositionNormalized,
    Company,
    Salary,
    Experience,
    EducationLevel,
    City,
    Skills,
    CompanySize,
    Industry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJobRecord {
    pub position: Option<String>,
    pub position_normalized: String,
    pub company: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_avg: Option<f64>,
    pub salary_unit: Option<SalaryUnit>,
    pub exp_min: Option<f64>,
    pub exp_max: Option<f64>,
    pub education_level: EducationLevel,
    pub city: String,
    pub district: String,
    pub skills: Vec<String>,
    pub company_size: Option<String>,
    pub industry: Option<String>,
    pub processed_at: DateTime<Local>,
}

impl NormalizedJobRecord {
    pub fn empty(processed_at: DateTime<Local>) -> Self {
        Self {
            position: None,
            position_normalized: String::new(),
            company: String::new(),
            salary_min: None,
            salary_max: None,
            salary_avg: None,
            salary_unit: None,
            exp_min: None,
            exp_max: None,
            education_level: EducationLevel::Unknown,
            city: String::new(),
            district: String::new(),
            skills: Vec::new(),
            company_size: None,
            industry: None,
            processed_at,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBatch {
    pub columns: BTreeSet<DerivedColumn>,
    pub records: Vec<NormalizedJobRecord>,
}

impl NormalizedBatch {
    pub fn has(&self, col: DerivedColumn) -> bool {
        self.columns.contains(&col)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_keys_round_trip() {
        for col in Column::ALL {
            assert_eq!(Column::from_key(col.key()), Some(col));
        }
        assert_eq!(Column::from_key("requirement"), None);
    }

    #[test]
    fn from_records_infers_present_columns() {
        let records = vec![
            RawJobRecord {
                position: Some("Java工程师".to_string()),
                ..Default::default()
            },
            RawJobRecord {
                salary: Some("15k-25k".to_string()),
                ..Default::default()
            },
        ];
        let batch = RawBatch::from_records(records);
        assert!(batch.has(Column::Position));
        assert!(batch.has(Column::Salary));
        assert!(!batch.has(Column::Location));
        assert_eq!(batch.len(), 2);
    }
}
