use crate::ai::LlmError;
use serde::{Deserialize, Serialize};

/// 合并进报告 `llm_analysis` 字段的文字分析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmAnalysis {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: String,
}

impl LlmAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.insights.is_empty() && self.recommendations.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InsightError {
    #[error("llm call failed: {0}")]
    Llm(#[from] LlmError),
    #[error("llm returned no usable analysis")]
    EmptyResponse,
}
