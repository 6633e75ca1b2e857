use crate::ai::types::{ChatRequest, ChatResponse, LlmError, LlmProvider};
use crate::ai::{build_llm_http_client, extract_chat_text, read_chat_response, KeyRing};
use async_trait::async_trait;
use log::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// 任意 OpenAI 风格 `/chat/completions` 接口（OpenAI、OpenRouter、DeepSeek 等）
#[derive(Clone)]
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    endpoint: String,
    keys: KeyRing,
}

impl OpenAiCompatProvider {
    /// `LLM_API_KEYS` / `LLM_API_KEY`；`LLM_API_URL` 为完整接口地址，
    /// 未设置时用 `LLM_BASE_URL` 拼接 `/chat/completions`
    pub fn from_env() -> Result<Self, LlmError> {
        let keys = KeyRing::from_env("LLM_API_KEYS", "LLM_API_KEY")?;
        let endpoint = match std::env::var("LLM_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                let base = std::env::var("LLM_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
                chat_endpoint(&base)
            }
        };
        Ok(Self {
            client: build_llm_http_client()?,
            endpoint,
            keys,
        })
    }
}

fn chat_endpoint(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError> {
        let body = serde_json::json!({
            "model": req.model,
            "temperature": req.temperature,
            "max_tokens": req.max_tokens,
            "messages": [
                {"role": "system", "content": req.system},
                {"role": "user", "content": req.user}
            ]
        });

        // 超时换下一个 key 重试一次
        let mut resp = None;
        for attempt in 0..2 {
            match self
                .client
                .post(&self.endpoint)
                .bearer_auth(self.keys.next())
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => {
                    resp = Some(r);
                    break;
                }
                Err(e) if e.is_timeout() => {
                    warn!("大模型请求超时 (第 {} 次)", attempt + 1);
                    continue;
                }
                Err(e) => return Err(LlmError::Http(e.to_string())),
            }
        }
        let resp = resp.ok_or_else(|| LlmError::Http("timeout".to_string()))?;

        let raw = read_chat_response(resp).await?;
        let text = extract_chat_text(&raw)?;
        Ok(ChatResponse { text })
    }
}
