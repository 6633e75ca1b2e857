use crate::ai::LlmProvider;
use crate::app_state::AppEvent;
use crate::pipeline::service::PipelineService;
use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, TimeZone};
use log::{error, info};
use tokio::sync::mpsc;

/// `now` 之后最近一次 `at` 时刻（严格晚于 now）
pub fn next_run_after(now: DateTime<Local>, at: NaiveTime) -> DateTime<Local> {
    let mut day = now.date_naive();
    loop {
        let candidate = match Local.from_local_datetime(&day.and_time(at)) {
            LocalResult::Single(t) => Some(t),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            // 夏令时跳过的时刻，顺延一小时
            LocalResult::None => Local
                .from_local_datetime(&(day.and_time(at) + Duration::hours(1)))
                .earliest(),
        };
        if let Some(t) = candidate.filter(|t| *t > now) {
            return t;
        }
        day = match day.succ_opt() {
            Some(d) => d,
            None => return now + Duration::days(1),
        };
    }
}

/// 每天 `at` 运行一次；单次失败只记录日志，继续等待下一次
pub async fn run_daily<P: LlmProvider>(
    service: &PipelineService<P>,
    at: NaiveTime,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) {
    loop {
        let now = Local::now();
        let next = next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        info!("下次运行时间: {}", next.format("%Y-%m-%d %H:%M:%S"));
        let _ = evt_tx.send(AppEvent::Message(format!(
            "下次运行时间: {}",
            next.format("%Y-%m-%d %H:%M:%S")
        )));
        tokio::time::sleep(wait).await;

        match service.run_once().await {
            Ok(summary) => {
                info!(
                    "定时任务完成: {} 条记录, 报告 {}",
                    summary.records,
                    summary.report_path.display()
                );
            }
            Err(e) => {
                error!("定时任务失败: {}", e);
                let _ = evt_tx.send(AppEvent::Error(format!("定时任务失败: {}", e)));
            }
        }
    }
}
