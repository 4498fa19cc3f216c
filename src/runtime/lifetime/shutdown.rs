use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use crate::analytics::HitRecorder;

/// 关闭时等待点击队列清空的超时时间（秒）
const DRAIN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C 信号
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, stopping server...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}

/// 等待已入队的点击写入存储
pub async fn drain_hits(recorder: &HitRecorder) {
    if recorder
        .wait_idle(Duration::from_secs(DRAIN_TIMEOUT_SECS))
        .await
    {
        info!("Hit queue drained");
    } else {
        error!(
            "Hit queue drain timed out after {} seconds, {} hit(s) lost",
            DRAIN_TIMEOUT_SECS,
            recorder.pending()
        );
    }

    let dropped = recorder.dropped();
    if dropped > 0 {
        warn!("{} hit(s) were dropped because the queue was full", dropped);
    }
}
