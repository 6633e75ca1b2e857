use crate::storage::error::StoreError;
use chrono::{DateTime, Local};
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ANALYSIS_PREFIX: &str = "analysis";
pub const CLEANED_PREFIX: &str = "jobs_cleaned";

/// 按日期落盘的 JSON 快照：`<prefix>_YYYYMMDD.json` 加一份 `<prefix>_latest.json`。
///
/// 两个文件都先写临时文件再 rename，读取方不会看到写了一半的内容。
/// 并发写入时后写者覆盖。
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    prefix: String,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// 分析报告快照
    pub fn analysis(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, ANALYSIS_PREFIX)
    }

    /// 清洗后记录快照
    pub fn cleaned(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, CLEANED_PREFIX)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(format!("{}_latest.json", self.prefix))
    }

    pub fn dated_path(&self, at: DateTime<Local>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", self.prefix, at.format("%Y%m%d")))
    }

    pub fn persist<T: Serialize>(&self, value: &T) -> Result<PathBuf, StoreError> {
        self.persist_dated(value, Local::now())
    }

    /// 写入当日快照并覆盖 latest，返回当日快照路径
    pub fn persist_dated<T: Serialize>(
        &self,
        value: &T,
        at: DateTime<Local>,
    ) -> Result<PathBuf, StoreError> {
        // 序列化失败时不碰磁盘
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let dated = self.dated_path(at);
        write_atomic(&dated, &bytes)?;
        write_atomic(&self.latest_path(), &bytes)?;
        info!("快照已保存: {} ({} 字节)", dated.display(), bytes.len());
        Ok(dated)
    }

    /// latest 不存在时返回 `Ok(None)`
    pub fn load_latest<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let path = self.latest_path();
        if !path.exists() {
            return Ok(None);
        }
        self.load(&path).map(Some)
    }

    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 同目录随机命名的临时文件 + rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".snapshot-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    // 失败时 NamedTempFile 析构会删掉临时文件
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AggregationEngine;
    use crate::normalize::{RawBatch, RawJobRecord, RecordNormalizer};
    use chrono::TimeZone;

    fn report() -> crate::analysis::AggregateReport {
        let records = (0..12)
            .map(|i| RawJobRecord {
                position: Some("算法工程师".to_string()),
                company: Some("某科技".to_string()),
                salary: Some(format!("{}k-{}k", 20 + i, 30 + i)),
                experience: Some("1-3年".to_string()),
                education: Some("硕士".to_string()),
                location: Some("杭州-西湖区".to_string()),
                description: Some("pytorch tensorflow python".to_string()),
                ..Default::default()
            })
            .collect();
        let batch = RecordNormalizer::default()
            .normalize(&RawBatch::from_records(records))
            .0;
        AggregationEngine::default().analyze(&batch)
    }

    #[test]
    fn persist_then_load_latest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::analysis(dir.path());
        let report = report();

        let at = Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let path = store.persist_dated(&report, at).unwrap();
        assert_eq!(path, dir.path().join("analysis_20240309.json"));
        assert!(store.latest_path().exists());

        let loaded: crate::analysis::AggregateReport = store.load_latest().unwrap().unwrap();
        assert_eq!(loaded, report);
        let dated: crate::analysis::AggregateReport = store.load(&path).unwrap();
        assert_eq!(dated, report);
    }

    #[test]
    fn load_latest_without_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::analysis(dir.path().join("missing"));
        let loaded: Option<serde_json::Value> = store.load_latest().unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn latest_is_overwritten_and_no_temp_files_remain() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path(), "demo");
        store.persist(&serde_json::json!({"v": 1})).unwrap();
        store.persist(&serde_json::json!({"v": 2})).unwrap();

        let latest: serde_json::Value = store.load_latest().unwrap().unwrap();
        assert_eq!(latest["v"], 2);
        let leftovers = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn corrupt_latest_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::cleaned(dir.path());
        fs::write(store.latest_path(), b"{not json").unwrap();
        let err = store.load_latest::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn concurrent_writes_to_same_path_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("analysis_latest.json");
        std::thread::scope(|scope| {
            for i in 0..8 {
                let target = &target;
                scope.spawn(move || {
                    let body = format!("{{\"v\": {}}}", i);
                    write_atomic(target, body.as_bytes()).unwrap();
                });
            }
        });

        let latest: serde_json::Value =
            serde_json::from_slice(&fs::read(&target).unwrap()).unwrap();
        assert!(latest["v"].as_u64().unwrap() < 8);
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["analysis_latest.json".to_string()]);
    }
}
