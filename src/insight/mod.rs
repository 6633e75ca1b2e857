pub mod offline;
pub mod parser;
pub mod prompt;
pub mod service;
pub mod types;

pub use service::InsightService;
pub use types::{InsightError, LlmAnalysis};
