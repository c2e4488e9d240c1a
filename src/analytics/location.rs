//! Approximate click location
//!
//! The engine never invents locations. A provider either knows something
//! about the click or the event is stored as [`UNKNOWN_LOCATION`].

use super::ClickContext;

pub const UNKNOWN_LOCATION: &str = "unknown";

/// 位置查询 trait
pub trait LocationProvider: Send + Sync {
    fn locate(&self, ctx: &ClickContext) -> Option<String>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Knows nothing; every click without a host hint is "unknown".
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownLocation;

impl LocationProvider for UnknownLocation {
    fn locate(&self, _ctx: &ClickContext) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Fixed location for every click (single-site deployments, tests)
#[derive(Debug, Clone)]
pub struct StaticLocation(pub String);

impl LocationProvider for StaticLocation {
    fn locate(&self, _ctx: &ClickContext) -> Option<String> {
        Some(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Resolve the stored location string for a click: host hint first, then
/// the provider, then [`UNKNOWN_LOCATION`].
pub fn resolve_location(provider: &dyn LocationProvider, ctx: &ClickContext) -> String {
    ctx.location_hint
        .as_deref()
        .map(str::trim)
        .filter(|hint| !hint.is_empty())
        .map(String::from)
        .or_else(|| provider.locate(ctx))
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}
