use std::path::PathBuf;

/// 一次完整运行的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub salary_parsed: usize,
    pub cleaned_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub enriched: bool,
}

#[derive(Debug)]
pub enum AppEvent {
    Log(String),
    Message(String),
    Error(String),
    Finished(RunSummary),
}
