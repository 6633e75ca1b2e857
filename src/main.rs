mod ai;
mod analysis;
mod app_service;
mod app_state;
mod commands;
mod config;
mod insight;
mod normalize;
mod pipeline;
mod source;
mod storage;

use anyhow::Context;
use chrono::Local;
use log::{error, info};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::app_service::build_pipeline;
use crate::app_state::AppEvent;
use crate::commands::{AppCommand, USAGE};
use crate::config::AppConfig;
use crate::pipeline::run_daily;
use crate::storage::SnapshotStore;

fn init_logging() -> anyhow::Result<PathBuf> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir).context("创建日志目录失败")?;
    let log_path = log_dir.join(format!("jobinsight-{}.log", ts));
    let log_file = std::fs::File::create(&log_path).context("创建日志文件失败")?;
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn)
        .filter_module("jobinsight", log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Error)
        .filter_module("hyper", log::LevelFilter::Error)
        // RUST_LOG 覆盖上面的默认值
        .parse_default_env()
        .init();
    Ok(log_path)
}

fn print_event(evt: AppEvent) {
    match evt {
        AppEvent::Log(msg) | AppEvent::Message(msg) => println!("{}", msg),
        AppEvent::Error(msg) => eprintln!("{}", msg),
        AppEvent::Finished(summary) => {
            println!(
                "✓ 完成: {} 条记录 (薪资解析 {} 条), 报告 {}{}",
                summary.records,
                summary.salary_parsed,
                summary.report_path.display(),
                if summary.enriched { ", 已含大模型分析" } else { "" }
            );
            if let Some(path) = summary.cleaned_path {
                println!("  清洗数据 {}", path.display());
            }
        }
    }
}

async fn dispatch(
    cmd: AppCommand,
    cfg: &AppConfig,
    evt_tx: mpsc::UnboundedSender<AppEvent>,
) -> anyhow::Result<()> {
    match cmd {
        AppCommand::Run => {
            let svc = build_pipeline(cfg)?.with_events(evt_tx);
            svc.run_once().await.context("运行失败")?;
        }
        AppCommand::Analyze { path } => {
            let svc = build_pipeline(cfg)?.with_events(evt_tx);
            svc.analyze_cleaned(path.as_deref())
                .await
                .context("分析失败")?;
        }
        AppCommand::Show => {
            commands::show::run(&SnapshotStore::analysis(&cfg.analysis_dir), &evt_tx);
        }
        AppCommand::Schedule { at } => {
            let at = at.unwrap_or(cfg.schedule_at);
            let svc = build_pipeline(cfg)?.with_events(evt_tx.clone());
            let _ = evt_tx.send(AppEvent::Message(format!(
                "定时模式: 每天 {} 运行，Ctrl+C 退出",
                at.format("%H:%M")
            )));
            tokio::select! {
                _ = run_daily(&svc, at, evt_tx.clone()) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("收到退出信号，定时任务结束");
                }
            }
        }
        AppCommand::Help => println!("{}", USAGE),
        AppCommand::Unknown(msg) => anyhow::bail!(msg),
    }
    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // .env 先于日志加载，RUST_LOG 可以写在 .env 里
    let env_loaded = dotenv::dotenv().is_ok();
    let log_path = init_logging()?;
    info!(
        "启动, .env {}, 日志 {}",
        if env_loaded { "已加载" } else { "未找到" },
        log_path.display()
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd: AppCommand = args.join(" ").parse().unwrap_or(AppCommand::Help);
    let cfg = AppConfig::from_env().context("读取配置失败")?;

    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(evt) = evt_rx.recv().await {
            print_event(evt);
        }
    });

    let result = dispatch(cmd, &cfg, evt_tx).await;
    // dispatch 返回后发送端已全部释放，打印任务会自然结束
    let _ = printer.await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
