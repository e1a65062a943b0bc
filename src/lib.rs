//! 尺码表管理服务：分类、尺码标签、尺码表的管理接口，带 API key 鉴权与限流的公共只读接口，
//! 模板目录、演示数据重置以及 JSON 导入导出。

pub mod api;
pub mod config;
pub mod domain;
pub mod editor;
pub mod errors;
pub mod services;
pub mod state;
pub mod storage;
pub mod templates;
pub mod transfer;
pub mod units;

use anyhow::Context;
use chrono::Utc;
use config::Config;
use log::{error, info, warn};
use state::{AppState, SharedState};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// 连接数据库、按需写入演示数据、启动周期重置，然后开始监听
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("正在初始化数据库: {}", config.database_url);
    let db = storage::establish_connection(&config.database_url)
        .await
        .context("数据库连接失败")?;
    info!("✓ 数据库连接成功");

    let state = AppState::new(db, config);

    if state.config.demo_mode {
        info!("演示模式已开启");
        if state.config.demo_reset_token.is_none() {
            warn!("⚠ 未设置 DEMO_RESET_TOKEN，/api/demo/reset 将拒绝所有请求");
        }
        if templates::seed_if_empty(&state.db).await?.is_some() {
            state.demo.record(Utc::now().timestamp()).await;
        }
        if let Some(interval) = state.config.demo_reset_interval {
            spawn_demo_reset_loop(state.clone(), interval);
        }
    }

    let address = state.config.bind_address();
    let app = api::build_router(state);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法绑定地址 {}", address))?;
    info!("✓ 服务已启动: http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务异常退出")?;

    info!("服务已停止");
    Ok(())
}

fn spawn_demo_reset_loop(state: SharedState, interval: Duration) {
    info!("演示数据将每 {} 秒重置一次", interval.as_secs());
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match templates::reset_demo_data(&state.db).await {
                Ok(summary) => {
                    state.demo.record(Utc::now().timestamp()).await;
                    info!("✓ 定时重置演示数据: {} 张尺码表", summary.charts);
                }
                Err(e) => error!("定时重置演示数据失败: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("无法监听 Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("收到 Ctrl+C，准备退出");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("收到 SIGTERM，准备退出");
            }
            Err(e) => {
                error!("无法监听 SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
