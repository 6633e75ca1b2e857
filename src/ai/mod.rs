pub mod cerebras;
pub mod openai;
pub mod types;
pub mod unified;

pub use types::{ChatRequest, LlmError, LlmProvider};
pub use unified::AnyProvider;

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_llm_http_client() -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);

    if let Ok(raw) = std::env::var("LLM_PROXY") {
        let t = raw.trim();
        if !t.is_empty() {
            let url = if t.contains("://") {
                t.to_string()
            } else {
                format!("socks5h://{}", t)
            };
            let proxy = reqwest::Proxy::all(&url).map_err(|e| LlmError::Http(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
    }

    builder.build().map_err(|e| LlmError::Http(e.to_string()))
}

/// 逗号、分号、空白分隔的 key 列表
pub(crate) fn split_keys(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// 多个 key 轮换使用；`<PREFIX>_API_KEYS` 优先，其次 `<PREFIX>_API_KEY`
#[derive(Clone, Debug)]
pub(crate) struct KeyRing {
    keys: Vec<String>,
    index: Arc<AtomicUsize>,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            index: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn from_env(list_var: &str, single_var: &'static str) -> Result<Self, LlmError> {
        let keys = std::env::var(list_var)
            .map(|s| split_keys(&s))
            .unwrap_or_default();
        if !keys.is_empty() {
            return Ok(Self::new(keys));
        }
        let key = std::env::var(single_var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingEnv(single_var))?;
        Ok(Self::new(vec![key.trim().to_string()]))
    }

    pub fn next(&self) -> &str {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        &self.keys[i % self.keys.len()]
    }
}

/// 从 chat/completions 返回体中取出文本。
/// 兼容 message.content（字符串或 parts 数组）、content、text 以及顶层 output_text。
pub(crate) fn extract_chat_text(raw: &str) -> Result<String, LlmError> {
    let v: Value = serde_json::from_str(raw)
        .map_err(|e| LlmError::InvalidResponse(format!("json parse failed: {e}, raw={raw}")))?;

    let Some(choice0) = v.get("choices").and_then(|c| c.get(0)) else {
        if let Some(Value::String(s)) = v.get("output_text") {
            return Ok(s.clone());
        }
        return Err(LlmError::InvalidResponse(format!(
            "missing choices[0], raw={raw}"
        )));
    };

    let content = choice0
        .get("message")
        .and_then(|m| m.get("content"))
        .or_else(|| choice0.get("content"));

    match content {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Array(arr)) => {
            let parts: Vec<&str> = arr
                .iter()
                .filter_map(|it| it.get("text").and_then(|x| x.as_str()).or_else(|| it.as_str()))
                .collect();
            Ok(parts.join("\n"))
        }
        Some(_) => Err(LlmError::InvalidResponse(format!(
            "unexpected content type, raw={raw}"
        ))),
        None => match choice0.get("text") {
            Some(Value::String(s)) => Ok(s.clone()),
            _ => Err(LlmError::InvalidResponse(format!(
                "missing content/text in choices[0], raw={raw}"
            ))),
        },
    }
}

/// 按状态码归类错误，成功时返回响应体
pub(crate) async fn read_chat_response(resp: reqwest::Response) -> Result<String, LlmError> {
    use reqwest::StatusCode;

    match resp.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LlmError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
        _ => {}
    }

    let status = resp.status();
    let raw = resp
        .text()
        .await
        .map_err(|e| LlmError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(LlmError::Http(format!("{} {}", status.as_u16(), raw)));
    }
    Ok(raw)
}
