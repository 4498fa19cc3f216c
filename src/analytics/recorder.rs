//! 点击记录器
//!
//! 重定向成功后，点击事件被投递到有界队列，由后台任务写入存储：
//! - 不阻塞响应，也不向客户端反馈结果
//! - 队列满或写入失败时只记录日志，该次点击丢失
//! - `wait_idle` 用于关闭流程和测试中等待队列清空

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, trace, warn};

use crate::services::{StatsEngine, now_nanos};

/// 等待队列清空时的轮询间隔
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct HitEvent {
    pub code: String,
    pub target: String,
    /// 重定向发生的时间（纳秒时间戳）
    pub at: u64,
}

impl HitEvent {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
            at: now_nanos(),
        }
    }
}

pub struct HitRecorder {
    tx: mpsc::Sender<HitEvent>,
    /// 已入队但尚未处理完的事件数
    pending: Arc<AtomicUsize>,
    dropped: AtomicU64,
}

impl HitRecorder {
    /// 启动后台写入任务，必须在 tokio 运行时内调用
    pub fn start(stats: Arc<StatsEngine>, capacity: usize) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(capacity);
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(Self::run(stats, rx, pending.clone()));
        debug!("Hit recorder started with queue capacity {}", capacity);

        Arc::new(Self {
            tx,
            pending,
            dropped: AtomicU64::new(0),
        })
    }

    /// 投递点击事件（非阻塞，可在任意线程调用）
    pub fn record(&self, event: HitEvent) {
        self.pending.fetch_add(1, Ordering::SeqCst);

        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                self.discard();
                warn!("Hit queue is full, dropping hit for {}", event.code);
            }
            Err(TrySendError::Closed(event)) => {
                self.discard();
                warn!("Hit recorder is stopped, dropping hit for {}", event.code);
            }
        }
    }

    fn discard(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// 因队列满或已关闭而丢弃的事件数
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Wait until every queued event has been applied, up to `timeout`.
    ///
    /// Returns `false` if events were still pending when the time ran out.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.pending() == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(IDLE_POLL_INTERVAL).await;
        }
    }

    async fn run(
        stats: Arc<StatsEngine>,
        mut rx: mpsc::Receiver<HitEvent>,
        pending: Arc<AtomicUsize>,
    ) {
        while let Some(event) = rx.recv().await {
            let stats = stats.clone();
            let HitEvent { code, target, at } = event;
            trace!("Applying hit for {} -> {}", code, target);

            let task_code = code.clone();
            let result =
                tokio::task::spawn_blocking(move || stats.record_hit_at(&task_code, at)).await;

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("{}", e),
                Err(e) => error!("Hit accounting task for {} panicked: {}", code, e),
            }

            pending.fetch_sub(1, Ordering::SeqCst);
        }

        debug!("Hit recorder queue closed");
    }
}
