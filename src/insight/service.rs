use crate::ai::{ChatRequest, LlmError, LlmProvider};
use crate::analysis::engine::TIMESTAMP_FORMAT;
use crate::analysis::AggregateReport;
use crate::insight::offline::offline_analysis;
use crate::insight::parser::parse_analysis;
use crate::insight::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::insight::types::{InsightError, LlmAnalysis};
use chrono::{DateTime, Local};
use log::{info, warn};

/// 报告的文字解读。未配置 provider 时走离线分析；配置了但调用失败则返回错误。
pub struct InsightService<P: LlmProvider> {
    provider: Option<P>,
    model: String,
}

impl<P: LlmProvider> InsightService<P> {
    pub fn new(provider: Option<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn offline() -> Self {
        Self::new(None, String::new())
    }

    pub async fn analyze(&self, report: &AggregateReport) -> Result<LlmAnalysis, InsightError> {
        self.analyze_at(report, Local::now()).await
    }

    pub async fn analyze_at(
        &self,
        report: &AggregateReport,
        now: DateTime<Local>,
    ) -> Result<LlmAnalysis, InsightError> {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let Some(provider) = &self.provider else {
            info!("未配置大模型，使用离线分析");
            return Ok(offline_analysis(report, timestamp));
        };

        let prompt = PromptBuilder::new(report).build();
        let req = ChatRequest::new(self.model.clone(), SYSTEM_PROMPT, prompt);
        info!("调用大模型分析: provider={}, model={}", provider.name(), self.model);

        let resp = match provider.chat(req).await {
            Ok(r) => r,
            Err(LlmError::Unauthorized) => {
                warn!("大模型未授权，请检查 .env 中的 API key");
                return Err(LlmError::Unauthorized.into());
            }
            Err(e) => {
                warn!("大模型调用失败: {}", e);
                return Err(e.into());
            }
        };

        let mut analysis = parse_analysis(&resp.text);
        if analysis.is_empty() {
            warn!("大模型返回内容无法解析: {}", resp.text.chars().take(200).collect::<String>());
            return Err(InsightError::EmptyResponse);
        }
        analysis.timestamp = timestamp;
        info!(
            "大模型分析完成: 洞察 {} 条, 建议 {} 条",
            analysis.insights.len(),
            analysis.recommendations.len()
        );
        Ok(analysis)
    }

    /// 返回合并了 `llm_analysis` 的新报告
    pub async fn enrich(&self, report: &AggregateReport) -> Result<AggregateReport, InsightError> {
        let analysis = self.analyze(report).await?;
        Ok(report.with_llm_analysis(analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatResponse;
    use crate::analysis::AggregationEngine;
    use crate::normalize::NormalizedBatch;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct StubProvider {
        reply: Result<String, ()>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
            self.seen.lock().unwrap().push(req);
            match &self.reply {
                Ok(text) => Ok(ChatResponse { text: text.clone() }),
                Err(()) => Err(LlmError::Http("connection refused".to_string())),
            }
        }
    }

    fn report() -> AggregateReport {
        AggregationEngine::default().analyze(&NormalizedBatch::default())
    }

    #[tokio::test]
    async fn merges_parsed_reply_into_report() {
        let stub = StubProvider::replying(
            r#"{"summary": "需求平稳", "insights": ["a"], "recommendations": ["b", "c"]}"#,
        );
        let service = InsightService::new(Some(stub), "test-model");
        let at = Local.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let analysis = service.analyze_at(&report(), at).await.unwrap();
        assert_eq!(analysis.summary, "需求平稳");
        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(analysis.timestamp, "2024-06-01 10:00:00");

        let seen = service.provider.as_ref().unwrap().seen.lock().unwrap();
        assert_eq!(seen[0].model, "test-model");
        assert_eq!(seen[0].system, SYSTEM_PROMPT);
        assert_eq!(seen[0].max_tokens, 2000);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let service = InsightService::new(Some(StubProvider::failing()), "m");
        let err = service.enrich(&report()).await.unwrap_err();
        assert!(matches!(err, InsightError::Llm(LlmError::Http(_))));
    }

    #[tokio::test]
    async fn unusable_reply_is_an_error() {
        let service = InsightService::new(Some(StubProvider::replying("抱歉")), "m");
        let err = service.analyze(&report()).await.unwrap_err();
        assert!(matches!(err, InsightError::EmptyResponse));
    }

    #[tokio::test]
    async fn offline_without_provider() {
        let service: InsightService<StubProvider> = InsightService::offline();
        let base = report();
        let enriched = service.enrich(&base).await.unwrap();
        assert!(base.llm_analysis.is_none());
        let analysis = enriched.llm_analysis.unwrap();
        assert_eq!(analysis.insights.len(), 7);
        assert!(!analysis.timestamp.is_empty());
    }
}
