pub mod csv_file;
pub mod json_file;

pub use csv_file::CsvFileSource;
pub use json_file::JsonFileSource;

use crate::normalize::RawBatch;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("input not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("read {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input at {}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// 原始记录的提供方（抓取结果、文件等）
#[async_trait]
pub trait RecordSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<RawBatch, SourceError>;
}

/// 按扩展名选择读取方式：`.csv` 走 CSV，其余按 JSON / JSON Lines
pub fn open(path: impl Into<PathBuf>) -> Arc<dyn RecordSource> {
    let path = path.into();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Arc::new(CsvFileSource::new(path))
    } else {
        Arc::new(JsonFileSource::new(path))
    }
}

/// 抓取程序导出的 `jobs_latest.csv` 优先，没有时读 `jobs_latest.json`
pub fn latest_in(data_dir: impl AsRef<Path>) -> Arc<dyn RecordSource> {
    let csv = data_dir.as_ref().join(csv_file::LATEST_CSV);
    if csv.is_file() {
        Arc::new(CsvFileSource::new(csv))
    } else {
        Arc::new(JsonFileSource::latest_in(data_dir))
    }
}

pub(crate) async fn read_input(path: &Path) -> Result<String, SourceError> {
    match tokio::fs::read_to_string(path).await {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SourceError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(SourceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn picks_reader_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("export.CSV");
        tokio::fs::write(&csv, "position\nJava\n").await.unwrap();
        assert_eq!(open(&csv).name(), "csv-file");
        assert_eq!(open(dir.path().join("a.jsonl")).name(), "json-file");
        let batch = open(&csv).fetch().await.unwrap();
        assert_eq!(batch.records[0].position.as_deref(), Some("Java"));
    }

    #[tokio::test]
    async fn latest_prefers_scraper_csv() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_in(dir.path()).name(), "json-file");
        tokio::fs::write(dir.path().join(csv_file::LATEST_CSV), "\u{feff}position\n测试\n")
            .await
            .unwrap();
        let source = latest_in(dir.path());
        assert_eq!(source.name(), "csv-file");
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }
}
