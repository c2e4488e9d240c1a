pub mod location;
pub mod recorder;

pub use location::{
    LocationProvider, StaticLocation, UNKNOWN_LOCATION, UnknownLocation, resolve_location,
};
pub use recorder::ClickRecorder;

/// Request-side details of one resolution, filled in by the host.
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    /// 来源页面 (Referer header)，None 表示直接访问
    pub referrer: Option<String>,
    /// Location hint supplied by the host, used before the provider
    pub location_hint: Option<String>,
}

impl ClickContext {
    pub fn with_referrer<T: Into<String>>(mut self, referrer: T) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_location_hint<T: Into<String>>(mut self, location: T) -> Self {
        self.location_hint = Some(location.into());
        self
    }
}
