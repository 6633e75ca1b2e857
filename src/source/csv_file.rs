use crate::normalize::{Column, RawBatch, RawJobRecord};
use crate::source::{read_input, RecordSource, SourceError};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::BTreeSet;
use std::mem::take;
use std::path::{Path, PathBuf};

pub const LATEST_CSV: &str = "jobs_latest.csv";

/// 抓取程序导出的 CSV（utf-8-sig，首行为表头）
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv-file"
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

/// 逗号分隔，支持引号、双引号转义、引号内换行和 CRLF；空行跳过
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    // 末行没有换行符
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

/// 表头决定列是否存在；空单元格视为缺失
pub fn parse_records(text: &str, path: &Path) -> Result<RawBatch, SourceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = parse_rows(text).into_iter();
    let header = match rows.next() {
        Some(h) => h,
        None => return Ok(RawBatch::default()),
    };

    let mut columns = BTreeSet::new();
    let slots: Vec<Option<Column>> = header
        .iter()
        .map(|name| {
            let col = Column::from_key(name.trim());
            match col {
                Some(c) => {
                    columns.insert(c);
                }
                None => debug!("忽略未知字段: {}", name),
            }
            col
        })
        .collect();

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.len() > slots.len() {
            return Err(SourceError::Malformed {
                path: path.to_path_buf(),
                line: idx + 2,
                reason: format!("expected {} fields, got {}", slots.len(), row.len()),
            });
        }
        let mut record = RawJobRecord::default();
        for (slot, cell) in slots.iter().zip(row) {
            if let Some(col) = slot {
                if !cell.trim().is_empty() {
                    assign(&mut record, *col, cell);
                }
            }
        }
        records.push(record);
    }

    Ok(RawBatch::new(records, columns))
}

fn assign(record: &mut RawJobRecord, col: Column, cell: String) {
    let number = |s: &str| s.trim().parse::<f64>().ok().filter(|n| n.is_finite());
    match col {
        Column::Position => record.position = Some(cell),
        Column::Company => record.company = Some(cell),
        Column::Salary => record.salary = Some(cell),
        Column::SalaryMin => record.salary_min = number(&cell),
        Column::SalaryMax => record.salary_max = number(&cell),
        Column::Experience => record.experience = Some(cell),
        Column::Education => record.education = Some(cell),
        Column::Location => record.location = Some(cell),
        Column::Description => record.description = Some(cell),
        Column::CompanySize => record.company_size = Some(cell),
        Column::Industry => record.industry = Some(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quoted_fields() {
        let rows = parse_rows("a,\"b,c\",\"say \"\"hi\"\"\"\r\n\r\n1,\"x\ny\",3");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["a", "b,c", "say \"hi\""]);
        assert_eq!(rows[1], vec!["1", "x\ny", "3"]);
    }

    #[test]
    fn header_drives_columns_and_empty_cells_are_absent() {
        let text = "\u{feff}position,salary,location,url,salary_min\n\
                    Java开发,15k-25k,,http://x,8000\n\
                    测试,,上海-浦东新区,,\n";
        let batch = parse_records(text, Path::new("jobs.csv")).unwrap();
        assert_eq!(batch.len(), 2);
        // BOM 不能粘在第一个列名上
        assert!(batch.has(Column::Position));
        assert!(batch.has(Column::Location));
        assert!(!batch.has(Column::Company));
        assert_eq!(batch.records[0].location, None);
        assert_eq!(batch.records[0].salary_min, Some(8000.0));
        assert_eq!(batch.records[1].salary, None);
        assert_eq!(batch.records[1].location.as_deref(), Some("上海-浦东新区"));
    }

    #[test]
    fn extra_cells_are_malformed() {
        let err = parse_records("position\nJava,多余\n", Path::new("bad.csv")).unwrap_err();
        match err {
            SourceError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_is_empty_batch() {
        let batch = parse_records("position,salary\n", Path::new("a.csv")).unwrap();
        assert!(batch.is_empty());
        assert!(batch.has(Column::Salary));
    }

    #[tokio::test]
    async fn fetch_reads_scraper_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LATEST_CSV);
        tokio::fs::write(&path, "\u{feff}position,education\nPython,本科\n")
            .await
            .unwrap();
        let batch = CsvFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(batch.records[0].education.as_deref(), Some("本科"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvFileSource::new(dir.path().join(LATEST_CSV))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
