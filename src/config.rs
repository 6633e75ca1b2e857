use chrono::NaiveTime;
use std::path::PathBuf;

pub const DEFAULT_SCHEDULE_AT: &str = "02:00";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub analysis_dir: PathBuf,
    /// 指定输入文件；None 时读取 data_dir 下的 jobs_latest.*
    pub input_file: Option<PathBuf>,
    /// None 时由 provider 决定默认模型
    pub llm_model: Option<String>,
    pub llm_provider: Option<String>,
    pub llm_enabled: bool,
    pub schedule_at: NaiveTime,
}

impl AppConfig {
    /// 读取进程环境（调用前应已加载 .env）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let llm_enabled = match get("LLM_ENABLED") {
            None => true,
            Some(v) => parse_bool(&v).ok_or(ConfigError::InvalidValue {
                key: "LLM_ENABLED",
                value: v,
            })?,
        };

        let schedule_raw = get("SCHEDULE_AT").unwrap_or_else(|| DEFAULT_SCHEDULE_AT.to_string());
        let schedule_at = parse_time(&schedule_raw).ok_or(ConfigError::InvalidValue {
            key: "SCHEDULE_AT",
            value: schedule_raw,
        })?;

        Ok(Self {
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            analysis_dir: get("ANALYSIS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./analysis")),
            input_file: get("INPUT_FILE").map(PathBuf::from),
            llm_model: get("LLM_MODEL"),
            llm_provider: get("LLM_PROVIDER"),
            llm_enabled,
            schedule_at,
        })
    }
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `HH:MM`
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}
