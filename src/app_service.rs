use crate::ai::{AnyProvider, LlmError};
use crate::config::AppConfig;
use crate::insight::InsightService;
use crate::pipeline::PipelineService;
use crate::source;
use crate::storage::SnapshotStore;
use log::{info, warn};

/// 按配置选择大模型；缺少 key 时退回离线分析
pub fn build_insight(cfg: &AppConfig) -> Result<Option<InsightService<AnyProvider>>, LlmError> {
    if !cfg.llm_enabled {
        info!("LLM_ENABLED=false，跳过大模型分析");
        return Ok(None);
    }

    let name = cfg.llm_provider.as_deref().unwrap_or("openai");
    let provider = match AnyProvider::by_name(name) {
        Ok(p) => p,
        Err(LlmError::MissingEnv(var)) => {
            warn!("未设置 {}，使用离线分析", var);
            return Ok(Some(InsightService::offline()));
        }
        Err(e) => return Err(e),
    };
    let model = cfg
        .llm_model
        .clone()
        .unwrap_or_else(|| provider.default_model().to_string());
    info!("大模型: provider={}, model={}", name, model);
    Ok(Some(InsightService::new(Some(provider), model)))
}

pub fn build_pipeline(cfg: &AppConfig) -> Result<PipelineService<AnyProvider>, LlmError> {
    let insight = build_insight(cfg)?;
    let input = match &cfg.input_file {
        Some(path) => source::open(path),
        None => source::latest_in(&cfg.data_dir),
    };
    info!("数据源: {}", input.name());
    Ok(PipelineService::new(
        input,
        SnapshotStore::cleaned(&cfg.data_dir),
        SnapshotStore::analysis(&cfg.analysis_dir),
        insight,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, provider: Option<&str>) -> AppConfig {
        let mut cfg = AppConfig::from_lookup(|_| None).unwrap();
        cfg.llm_enabled = enabled;
        cfg.llm_provider = provider.map(String::from);
        cfg
    }

    #[test]
    fn disabled_llm_skips_enrichment() {
        assert!(build_insight(&config(false, None)).unwrap().is_none());
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let err = build_insight(&config(true, Some("nope"))).err().unwrap();
        assert!(matches!(err, LlmError::UnknownProvider(_)));
    }

    #[tokio::test]
    async fn run_consumes_scraper_csv() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(
            data_dir.join("jobs_latest.csv"),
            "\u{feff}position,salary,experience,education,location\n\
             Java开发,15k-25k,3-5年,本科,上海-浦东新区\n\
             前端,10k-15k,,大专,\n",
        )
        .unwrap();

        let mut cfg = config(false, None);
        cfg.data_dir = data_dir;
        cfg.analysis_dir = dir.path().join("analysis");
        let summary = build_pipeline(&cfg).unwrap().run_once().await.unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.salary_parsed, 2);
        assert!(!summary.enriched);
        assert!(dir.path().join("analysis/analysis_latest.json").exists());
    }
}
