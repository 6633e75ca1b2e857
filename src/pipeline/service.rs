use crate::ai::LlmProvider;
use crate::analysis::{AggregateReport, AggregationEngine};
use crate::app_state::{AppEvent, RunSummary};
use crate::insight::{InsightError, InsightService};
use crate::normalize::{NormalizedBatch, RecordNormalizer};
use crate::source::{RecordSource, SourceError};
use crate::storage::{SnapshotStore, StoreError};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source failed: {0}")]
    Source(#[from] SourceError),
    #[error("no records acquired")]
    NoRecords,
    #[error("no cleaned snapshot at {}", .0.display())]
    NoCleanedSnapshot(PathBuf),
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),
    #[error("enrichment failed: {0}")]
    Insight(#[from] InsightError),
}

/// 抓取 → 清洗 → 聚合 → 落盘 → 大模型解读 → 再落盘
pub struct PipelineService<P: LlmProvider> {
    source: Arc<dyn RecordSource>,
    normalizer: RecordNormalizer,
    engine: AggregationEngine,
    cleaned: SnapshotStore,
    reports: SnapshotStore,
    insight: Option<InsightService<P>>,
    evt_tx: Option<mpsc::UnboundedSender<AppEvent>>,
}

impl<P: LlmProvider> PipelineService<P> {
    pub fn new(
        source: Arc<dyn RecordSource>,
        cleaned: SnapshotStore,
        reports: SnapshotStore,
        insight: Option<InsightService<P>>,
    ) -> Self {
        Self {
            source,
            normalizer: RecordNormalizer::default(),
            engine: AggregationEngine::default(),
            cleaned,
            reports,
            insight,
            evt_tx: None,
        }
    }

    pub fn with_events(mut self, evt_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        self.evt_tx = Some(evt_tx);
        self
    }

    fn emit(&self, evt: AppEvent) {
        if let Some(tx) = &self.evt_tx {
            let _ = tx.send(evt);
        }
    }

    fn log(&self, msg: String) {
        info!("{}", msg);
        self.emit(AppEvent::Log(msg));
    }

    /// 失败时已写入的快照保持原样
    pub async fn run_once(&self) -> Result<RunSummary, PipelineError> {
        self.log(format!("开始获取原始数据: {}", self.source.name()));
        let raw = self.source.fetch().await.map_err(|e| {
            error!("获取原始数据失败: {}", e);
            e
        })?;
        if raw.is_empty() {
            warn!("未获取到任何招聘数据，本次运行终止");
            return Err(PipelineError::NoRecords);
        }

        let (batch, stats) = self.normalizer.normalize(&raw);
        self.log(format!(
            "清洗完成: {} 条, 薪资解析成功 {} 条",
            stats.records, stats.salary_parsed
        ));
        let cleaned_path = self.cleaned.persist(&batch)?;

        let mut summary = self.publish(&batch).await?;
        summary.records = stats.records;
        summary.salary_parsed = stats.salary_parsed;
        summary.cleaned_path = Some(cleaned_path);
        self.emit(AppEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// 对已有的清洗快照重新聚合；`path` 为空时读取 latest
    pub async fn analyze_cleaned(&self, path: Option<&Path>) -> Result<RunSummary, PipelineError> {
        let batch: NormalizedBatch = match path {
            Some(p) => self.cleaned.load(p)?,
            None => self
                .cleaned
                .load_latest()?
                .ok_or_else(|| PipelineError::NoCleanedSnapshot(self.cleaned.latest_path()))?,
        };
        if batch.is_empty() {
            warn!("清洗快照中没有记录，本次分析终止");
            return Err(PipelineError::NoRecords);
        }
        self.log(format!("读取清洗数据 {} 条", batch.len()));

        let mut summary = self.publish(&batch).await?;
        summary.records = batch.len();
        summary.salary_parsed = batch
            .records
            .iter()
            .filter(|r| r.salary_avg.is_some())
            .count();
        self.emit(AppEvent::Finished(summary.clone()));
        Ok(summary)
    }

    async fn publish(&self, batch: &NormalizedBatch) -> Result<RunSummary, PipelineError> {
        let report = self.engine.analyze(batch);
        let report_path = self.reports.persist(&report)?;
        self.log(format!("分析结果已保存: {}", report_path.display()));

        let enriched = match &self.insight {
            Some(insight) => {
                let enriched = self.enrich(insight, &report).await?;
                self.reports.persist(&enriched)?;
                self.log("大模型分析已合并进报告".to_string());
                true
            }
            None => false,
        };

        Ok(RunSummary {
            report_path,
            enriched,
            ..Default::default()
        })
    }

    async fn enrich(
        &self,
        insight: &InsightService<P>,
        report: &AggregateReport,
    ) -> Result<AggregateReport, PipelineError> {
        match insight.enrich(report).await {
            Ok(r) => Ok(r),
            Err(e) => {
                error!("大模型分析失败，保留未解读的报告: {}", e);
                self.emit(AppEvent::Error(format!("大模型分析失败: {}", e)));
                Err(e.into())
            }
        }
    }
}
