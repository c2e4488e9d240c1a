use std::sync::Arc;

use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::errors::Result;
use crate::services::{LinkService, LinkSettings, RandomCodeGenerator, TracingLogSink};
use crate::storage::StorageFactory;

/// 根据静态配置构建 LinkService
///
/// Storage, code generator and log sink all come from `config`; clock and
/// location provider keep their defaults.
pub fn build_link_service(config: &StaticConfig) -> Result<Arc<LinkService>> {
    let backend = StorageFactory::create(&config.storage)?;
    let settings = LinkSettings::from(&config.links);
    debug!(
        "Link settings: default validity {} min, batch limit {}",
        settings.default_validity_minutes, settings.max_batch
    );

    let service = LinkService::from_backend(backend, settings, config.clicks.max_buffered_clicks)
        .with_generator(Arc::new(RandomCodeGenerator::new(config.links.code_length)))
        .with_notifier(Arc::new(TracingLogSink));

    Ok(Arc::new(service))
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<Arc<LinkService>> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let service = build_link_service(config)?;
    let existing = service.link_store().len().await?;
    info!("Loaded {} existing links", existing);

    // 启动点击记录的后台刷盘任务
    if config.clicks.flush_interval_secs > 0 {
        let recorder = service.click_recorder().clone();
        let interval = std::time::Duration::from_secs(config.clicks.flush_interval_secs);
        tokio::spawn(async move {
            recorder.start_background_task(interval).await;
        });
        debug!("Click flush task started ({:?} interval)", interval);
    } else {
        debug!("Periodic click flush disabled");
    }

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(service)
}
