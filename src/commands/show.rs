use crate::analysis::{AggregateReport, Ranked};
use crate::app_state::AppEvent;
use crate::storage::SnapshotStore;
use log::error;
use tokio::sync::mpsc;

pub fn run(store: &SnapshotStore, evt_tx: &mpsc::UnboundedSender<AppEvent>) {
    match store.load_latest::<AggregateReport>() {
        Ok(Some(report)) => {
            for line in render(&report).lines() {
                let _ = evt_tx.send(AppEvent::Message(line.to_string()));
            }
        }
        Ok(None) => {
            let _ = evt_tx.send(AppEvent::Error(format!(
                "✗ 尚无分析结果: {}",
                store.latest_path().display()
            )));
        }
        Err(e) => {
            error!("{}", e);
            let _ = evt_tx.send(AppEvent::Error(format!("✗ 读取分析结果失败: {}", e)));
        }
    }
}

fn money(v: Option<f64>) -> String {
    v.map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn top(counts: Option<&Ranked<usize>>, n: usize) -> String {
    match counts {
        Some(c) if !c.is_empty() => c
            .iter()
            .take(n)
            .map(|(k, v)| format!("{}({})", k, v))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "-".to_string(),
    }
}

/// 报告摘要，供终端查看
pub fn render(report: &AggregateReport) -> String {
    let b = &report.basic_stats;
    let s = &report.salary_analysis;
    let mut lines = vec![
        format!("分析时间: {}", report.timestamp),
        format!(
            "职位 {} 个 | 职位类型 {} | 公司 {} | 城市 {}",
            b.total_jobs, b.unique_positions, b.unique_companies, b.unique_cities
        ),
        format!(
            "薪资(元/月): 均值 {} | 中位数 {} | 区间 {} - {}",
            money(s.mean),
            money(s.median),
            money(s.min),
            money(s.max)
        ),
        format!(
            "热门职位: {}",
            top(report.position_analysis.position_distribution.as_ref(), 5)
        ),
        format!("热门技能: {}", top(report.skill_analysis.top_skills.as_ref(), 10)),
        format!(
            "主要城市: {}",
            top(report.location_analysis.city_distribution.as_ref(), 5)
        ),
        format!(
            "经验要求: {}",
            top(report.experience_analysis.experience_distribution.as_ref(), 6)
        ),
        format!(
            "学历要求: {}",
            top(report.education_analysis.education_distribution.as_ref(), 10)
        ),
    ];

    if let Some(llm) = &report.llm_analysis {
        lines.push(String::new());
        lines.push(format!("总体分析: {}", llm.summary));
        for (i, item) in llm.insights.iter().enumerate() {
            lines.push(format!("洞察 {}. {}", i + 1, item));
        }
        for (i, item) in llm.recommendations.iter().enumerate() {
            lines.push(format!("建议 {}. {}", i + 1, item));
        }
    }
    lines.join("\n")
}
