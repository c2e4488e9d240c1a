use std::time::Duration;

use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::services::LinkService;

/// 单个任务超时时间（秒）
const TASK_TIMEOUT_SECS: u64 = 10;

pub async fn listen_for_shutdown(service: &LinkService) {
    // 等待 Ctrl+C 信号
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, flushing data...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    perform_shutdown_tasks(service).await;
}

/// 刷新点击缓冲（在超时内调用）
pub async fn perform_shutdown_tasks(service: &LinkService) {
    let recorder = service.click_recorder();
    match timeout(Duration::from_secs(TASK_TIMEOUT_SECS), recorder.try_flush()).await {
        Ok(Ok(count)) => {
            info!("ClickRecorder flushed {} pending clicks", count);
        }
        Ok(Err(e)) => {
            error!(
                "ClickRecorder flush failed, {} clicks lost: {}",
                recorder.pending(),
                e
            );
        }
        Err(_) => {
            error!(
                "ClickRecorder flush timed out after {} seconds",
                TASK_TIMEOUT_SECS
            );
        }
    }
}
