use crate::ai::types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
use crate::ai::{build_llm_http_client, extract_chat_text, read_chat_response, KeyRing};
use async_trait::async_trait;

pub const DEFAULT_BASE_URL: &str = "https://api.cerebras.ai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";

#[derive(Clone)]
pub struct CerebrasProvider {
    client: reqwest::Client,
    base_url: String,
    keys: KeyRing,
}

impl CerebrasProvider {
    pub fn from_env() -> Result<Self, LlmError> {
        let keys = KeyRing::from_env("CEREBRAS_API_KEYS", "CEREBRAS_API_KEY")?;
        let base_url = std::env::var("CEREBRAS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: build_llm_http_client()?,
            base_url,
            keys,
        })
    }
}

#[async_trait]
impl LlmProvider for CerebrasProvider {
    fn name(&self) -> &str {
        "cerebras"
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        // cerebras 用 max_completion_tokens
        let body = serde_json::json!({
            "model": req.model,
            "temperature": req.temperature,
            "max_completion_tokens": req.max_tokens,
            "messages": [
                {"role": "system", "content": req.system},
                {"role": "user", "content": req.user}
            ],
            "stream": false
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(self.keys.next())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let raw = read_chat_response(resp).await?;
        let text = extract_chat_text(&raw)?;
        Ok(ChatResponse { text })
    }
}
