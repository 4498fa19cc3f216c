use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::HitRecorder;
use crate::api::services::SiteInfo;
use crate::config::StaticConfig;
use crate::services::{AssignPolicy, Redirector, Registrar, StatsEngine};
use crate::storage::{CodeLengthCell, KvStore};

pub struct StartupContext {
    pub registrar: Arc<Registrar>,
    pub redirector: Arc<Redirector>,
    pub stats: Arc<StatsEngine>,
    pub recorder: Arc<HitRecorder>,
    pub site: SiteInfo,
}

/// 准备服务器启动的上下文
///
/// 打开存储、加载短码长度、启动点击记录器。必须在 tokio 运行时内调用。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = Arc::new(
        KvStore::open(&config.database.path)
            .with_context(|| format!("couldn't open database at {}", config.database.path))?,
    );
    info!("Using key-value store: {}", config.database.path);

    let length = CodeLengthCell::load(&store, config.generator.initial_length)
        .context("couldn't get settings")?;
    info!("Current code length: {}", length.get());

    let registrar = Arc::new(Registrar::new(
        store.clone(),
        length,
        AssignPolicy::from(&config.generator),
    ));
    let stats = Arc::new(StatsEngine::new(store.clone()));
    let recorder = HitRecorder::start(stats.clone(), config.stats.queue_capacity);
    let redirector = Arc::new(Redirector::new(store, recorder.clone()));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        registrar,
        redirector,
        stats,
        recorder,
        site: SiteInfo::new(config.server.public_url.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_prepare_uses_persisted_length() {
        let dir = TempDir::new().unwrap();
        let mut config = StaticConfig::default();
        config.database.path = dir.path().join("startup.redb").display().to_string();

        {
            let store = KvStore::open(&config.database.path).unwrap();
            store
                .update(|txn| txn.set_u64(crate::storage::keys::CODE_LENGTH_KEY, 6))
                .unwrap();
        }

        let ctx = prepare_server_startup(&config).await.unwrap();
        assert_eq!(ctx.registrar.code_length(), 6);
        assert_eq!(ctx.site.public_url, "http://localhost:8077");
    }

    #[tokio::test]
    async fn test_prepare_defaults_to_initial_length() {
        let dir = TempDir::new().unwrap();
        let mut config = StaticConfig::default();
        config.database.path = dir.path().join("fresh.redb").display().to_string();
        config.generator.initial_length = 5;

        let ctx = prepare_server_startup(&config).await.unwrap();
        assert_eq!(ctx.registrar.code_length(), 5);
    }
}
