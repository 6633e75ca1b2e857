use crate::normalize::{Column, RawBatch, RawJobRecord};
use crate::source::{read_input, RecordSource, SourceError};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const LATEST_JSON: &str = "jobs_latest.json";

/// 从 JSON 数组或 JSON Lines 文件读取原始记录
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/jobs_latest.json`
    pub fn latest_in(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(LATEST_JSON))
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn fetch(&self) -> Result<RawBatch, SourceError> {
        let text = read_input(&self.path).await?;
        let batch = parse_records(&text, &self.path)?;
        info!(
            "读取原始记录 {} 条 ({}), 列: {}",
            batch.len(),
            self.path.display(),
            batch
                .columns
                .iter()
                .map(|c| c.key())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(batch)
    }
}

/// 以 `[` 开头按 JSON 数组解析，否则按行解析（空行跳过）
pub fn parse_records(text: &str, path: &Path) -> Result<RawBatch, SourceError> {
    let malformed = |line: usize, reason: String| SourceError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut objects: Vec<(usize, Value)> = Vec::new();
    if text.trim_start().starts_with('[') {
        let items: Vec<Value> =
            serde_json::from_str(text).map_err(|e| malformed(e.line(), e.to_string()))?;
        objects.extend(items.into_iter().map(|v| (1, v)));
    } else {
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let v: Value =
                serde_json::from_str(line).map_err(|e| malformed(idx + 1, e.to_string()))?;
            objects.push((idx + 1, v));
        }
    }

    let mut columns = BTreeSet::new();
    let mut records = Vec::with_capacity(objects.len());
    for (line, value) in objects {
        let obj = value
            .as_object()
            .ok_or_else(|| malformed(line, "record is not an object".to_string()))?;
        for key in obj.keys() {
            match Column::from_key(key) {
                Some(col) => {
                    columns.insert(col);
                }
                None => debug!("忽略未知字段: {}", key),
            }
        }
        records.push(record_from(obj));
    }

    Ok(RawBatch::new(records, columns))
}

fn text(obj: &Map<String, Value>, col: Column) -> Option<String> {
    match obj.get(col.key())? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(obj: &Map<String, Value>, col: Column) -> Option<f64> {
    let v = obj.get(col.key())?;
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|n| n.is_finite())
}

fn record_from(obj: &Map<String, Value>) -> RawJobRecord {
    RawJobRecord {
        position: text(obj, Column::Position),
        company: text(obj, Column::Company),
        salary: text(obj, Column::Salary),
        salary_min: number(obj, Column::SalaryMin),
        salary_max: number(obj, Column::SalaryMax),
        experience: text(obj, Column::Experience),
        education: text(obj, Column::Education),
        location: text(obj, Column::Location),
        description: text(obj, Column::Description),
        company_size: text(obj, Column::CompanySize),
        industry: text(obj, Column::Industry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_array_and_tracks_columns() {
        let text = r#"[
            {"position": "Java开发", "salary": "15k-25k", "location": null},
            {"position": "测试", "company": "某公司", "url": "http://x"}
        ]"#;
        let batch = parse_records(text, Path::new("a.json")).unwrap();
        assert_eq!(batch.len(), 2);
        // 值为 null 的列也算存在
        assert!(batch.has(Column::Location));
        assert!(batch.has(Column::Company));
        assert!(!batch.has(Column::Description));
        assert_eq!(batch.records[0].location, None);
        assert_eq!(batch.records[1].company.as_deref(), Some("某公司"));
    }

    #[test]
    fn parses_json_lines() {
        let text = "{\"position\": \"前端\", \"salary_min\": 8000}\n\n{\"salary_max\": \"12000\"}\n";
        let batch = parse_records(text, Path::new("a.jsonl")).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].salary_min, Some(8000.0));
        assert_eq!(batch.records[1].salary_max, Some(12000.0));
        assert!(batch.has(Column::SalaryMin) && batch.has(Column::SalaryMax));
    }

    #[test]
    fn malformed_line_reports_position() {
        let text = "{\"position\": \"前端\"}\n{oops}\n";
        let err = parse_records(text, Path::new("bad.jsonl")).unwrap_err();
        match err {
            SourceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        let err = parse_records("[1, 2]", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[tokio::test]
    async fn fetch_reads_latest_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(LATEST_JSON),
            r#"[{"position": "Python", "education": "本科"}]"#,
        )
        .await
        .unwrap();
        let source = JsonFileSource::latest_in(dir.path());
        let batch = source.fetch().await.unwrap();
        assert_eq!(batch.records[0].education.as_deref(), Some("本科"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::latest_in(dir.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
