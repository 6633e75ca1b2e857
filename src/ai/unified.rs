use crate::ai::cerebras::{self, CerebrasProvider};
use crate::ai::openai::{self, OpenAiCompatProvider};
use crate::ai::types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
use async_trait::async_trait;

#[derive(Clone)]
enum InnerProvider {
    OpenAi(OpenAiCompatProvider),
    Cerebras(CerebrasProvider),
}

/// 按配置里的 provider 名称选择的具体实现
#[derive(Clone)]
pub struct AnyProvider {
    inner: InnerProvider,
}

impl AnyProvider {
    pub fn by_name(which: &str) -> Result<Self, LlmError> {
        let inner = match which.trim().to_lowercase().as_str() {
            "cerebras" => InnerProvider::Cerebras(CerebrasProvider::from_env()?),
            "openai" | "openrouter" | "" => InnerProvider::OpenAi(OpenAiCompatProvider::from_env()?),
            other => return Err(LlmError::UnknownProvider(other.to_string())),
        };
        Ok(Self { inner })
    }

    pub fn default_model(&self) -> &'static str {
        match &self.inner {
            InnerProvider::OpenAi(_) => openai::DEFAULT_MODEL,
            InnerProvider::Cerebras(_) => cerebras::DEFAULT_MODEL,
        }
    }
}

#[async_trait]
impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match &self.inner {
            InnerProvider::OpenAi(p) => p.name(),
            InnerProvider::Cerebras(p) => p.name(),
        }
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            InnerProvider::OpenAi(p) => p.chat(req).await,
            InnerProvider::Cerebras(p) => p.chat(req).await,
        }
    }
}
