use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

/// Default config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when `init_config`
/// was never called.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from `path` (or "config.toml").
///
/// Only the first call loads; later calls keep the existing instance.
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| {
            ArcSwap::from_pointee(StaticConfig::load(path.unwrap_or(DEFAULT_CONFIG_PATH)))
        })
        .load_full()
}
