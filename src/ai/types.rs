use async_trait::async_trait;

#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatResponse {
    pub text: String,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("missing env {0}")]
    MissingEnv(&'static str),
    #[error("unknown provider {0}")]
    UnknownProvider(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, LlmError>;
}
