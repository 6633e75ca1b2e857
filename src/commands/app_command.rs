use crate::config::parse_time;
use chrono::NaiveTime;
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "用法: jobinsight <run | analyze [cleaned.json] | show | schedule [HH:MM] | help>";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// 完整流程跑一次
    Run,
    Analyze {
        path: Option<PathBuf>,
    },
    Show,
    /// None 时使用配置里的 SCHEDULE_AT
    Schedule {
        at: Option<NaiveTime>,
    },
    Help,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Help);
        }

        match parts[0] {
            "run" => Ok(AppCommand::Run),
            "analyze" => Ok(AppCommand::Analyze {
                path: parts.get(1).map(PathBuf::from),
            }),
            "show" => Ok(AppCommand::Show),
            "schedule" => match parts.get(1) {
                None => Ok(AppCommand::Schedule { at: None }),
                Some(t) => match parse_time(t) {
                    Some(at) => Ok(AppCommand::Schedule { at: Some(at) }),
                    None => Ok(AppCommand::Unknown(format!(
                        "无效的时间: {}，用法: schedule [HH:MM]",
                        t
                    ))),
                },
            },
            "help" | "h" | "-h" | "--help" => Ok(AppCommand::Help),
            other => Ok(AppCommand::Unknown(format!("未知命令: {}\n{}", other, USAGE))),
        }
    }
}
