//! Link lifecycle service
//!
//! Orchestrates code generation, the link table and the click log to
//! implement batch creation, resolution and reporting. Shared by the HTTP
//! handlers and the CLI.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::clock::{Clock, SystemClock};
use super::code_generator::{CodeGenerator, RandomCodeGenerator};
use super::notifier::{LogLevel, LogSink, NoopLogSink};
use crate::analytics::{
    ClickContext, ClickRecorder, LocationProvider, UnknownLocation, resolve_location,
};
use crate::config::LinkConfig;
use crate::errors::{BatchError, EngineError, Result};
use crate::storage::{ClickEvent, LinkRecord, LinkStore, StorageBackend};
use crate::utils::{is_reserved_code, is_valid_short_code};
use crate::utils::url_validator::validate_url;

const LOG_STACK: &str = "backend";
const LOG_PACKAGE: &str = "service";

// ============ Request/Response DTOs ============

/// One entry of a creation batch
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Target URL; blank entries are skipped by `create_batch`
    pub target_url: String,
    /// Minutes of validity as submitted; blank or absent means the default
    pub validity_minutes: Option<String>,
    /// Requested code; blank or absent means generate one
    pub custom_code: Option<String>,
}

impl CreateLinkRequest {
    pub fn new<T: Into<String>>(target_url: T) -> Self {
        Self {
            target_url: target_url.into(),
            ..Default::default()
        }
    }

    pub fn with_validity<T: ToString>(mut self, minutes: T) -> Self {
        self.validity_minutes = Some(minutes.to_string());
        self
    }

    pub fn with_custom_code<T: Into<String>>(mut self, code: T) -> Self {
        self.custom_code = Some(code.into());
        self
    }
}

/// A committed link as reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedLink {
    pub code: String,
    pub target_url: String,
    pub short_link: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Human-readable expiry, e.g. "2026-10-14 12:30:00 UTC"
    pub expires_display: String,
}

/// Per-link row of the report
#[derive(Debug, Clone, Serialize)]
pub struct LinkStats {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub total_clicks: usize,
    pub clicks: Vec<ClickEvent>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub generated_at: DateTime<Utc>,
    pub links: Vec<LinkStats>,
    pub total_clicks: usize,
    pub unique_links: usize,
    pub active_links: usize,
}

/// Business rules applied by [`LinkService`]
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub base_url: String,
    pub default_validity_minutes: i64,
    pub max_batch: usize,
    pub max_generation_attempts: usize,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::from(&LinkConfig::default())
    }
}

impl From<&LinkConfig> for LinkSettings {
    fn from(config: &LinkConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            default_validity_minutes: config.default_validity_minutes.max(1),
            max_batch: config.max_batch,
            max_generation_attempts: config.max_generation_attempts.max(1),
        }
    }
}

pub fn format_expiry(expires_at: &DateTime<Utc>) -> String {
    expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// ============ LinkService Implementation ============

pub struct LinkService {
    links: Arc<LinkStore>,
    clicks: ClickRecorder,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    location: Arc<dyn LocationProvider>,
    notifier: Arc<dyn LogSink>,
    settings: LinkSettings,
}

impl LinkService {
    pub fn new(links: Arc<LinkStore>, clicks: ClickRecorder, settings: LinkSettings) -> Self {
        Self {
            links,
            clicks,
            generator: Arc::new(RandomCodeGenerator::default()),
            clock: Arc::new(SystemClock),
            location: Arc::new(UnknownLocation),
            notifier: Arc::new(NoopLogSink),
            settings,
        }
    }

    /// Link table and click log over the same backend.
    pub fn from_backend(
        backend: Arc<dyn StorageBackend>,
        settings: LinkSettings,
        max_buffered_clicks: usize,
    ) -> Self {
        let links = Arc::new(LinkStore::new(Arc::clone(&backend)));
        let clicks = ClickRecorder::new(backend, max_buffered_clicks);
        Self::new(links, clicks, settings)
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_location_provider(mut self, location: Arc<dyn LocationProvider>) -> Self {
        debug!("LinkService: location provider '{}'", location.name());
        self.location = location;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn LogSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    pub fn link_store(&self) -> &Arc<LinkStore> {
        &self.links
    }

    pub fn click_recorder(&self) -> &ClickRecorder {
        &self.clicks
    }

    fn notify(&self, level: LogLevel, message: &str) {
        self.notifier.log(LOG_STACK, level, LOG_PACKAGE, message);
    }

    // ============ Create ============

    /// Create links for every non-blank request, in order.
    ///
    /// Each entry is committed on its own; the first failing entry stops the
    /// batch but entries before it stay committed.
    pub async fn create_batch(
        &self,
        requests: &[CreateLinkRequest],
        max_batch: usize,
    ) -> std::result::Result<Vec<CreatedLink>, BatchError> {
        if requests.len() > max_batch {
            warn!(
                "LinkService: rejected batch of {} (limit {})",
                requests.len(),
                max_batch
            );
            return Err(BatchError::whole_batch(EngineError::too_many_requests(
                format!(
                    "At most {} URLs per batch, got {}",
                    max_batch,
                    requests.len()
                ),
            )));
        }

        let pending: Vec<(usize, &CreateLinkRequest)> = requests
            .iter()
            .enumerate()
            .filter(|(_, req)| !req.target_url.trim().is_empty())
            .map(|(i, req)| (i + 1, req))
            .collect();

        if pending.is_empty() {
            return Err(BatchError::whole_batch(EngineError::no_valid_requests(
                "Please enter at least one URL",
            )));
        }

        let mut created = Vec::with_capacity(pending.len());
        for (index, request) in pending {
            match self.create_one(request).await {
                Ok(link) => created.push(link),
                Err(e) => {
                    debug!("LinkService: request {} failed: {}", index, e);
                    self.notify(
                        LogLevel::Error,
                        &format!("Validation error for URL {}: {}", index, e.message()),
                    );
                    return Err(BatchError::at(index, e));
                }
            }
        }

        Ok(created)
    }

    /// Create a single link.
    pub async fn create(&self, request: CreateLinkRequest) -> Result<CreatedLink> {
        self.create_batch(std::slice::from_ref(&request), 1)
            .await
            .map_err(|e| e.error)?
            .pop()
            .ok_or_else(|| EngineError::no_valid_requests("Please enter at least one URL"))
    }

    async fn create_one(&self, request: &CreateLinkRequest) -> Result<CreatedLink> {
        let target_url = validate_url(&request.target_url)
            .map_err(|e| EngineError::invalid_url(e.to_string()))?;

        let minutes = self.parse_validity(request.validity_minutes.as_deref())?;

        let custom_code = match request
            .custom_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            Some(code) => {
                if is_reserved_code(code) {
                    return Err(EngineError::invalid_shortcode(format!(
                        "Shortcode '{}' is reserved",
                        code
                    )));
                }
                if !is_valid_short_code(code) {
                    return Err(EngineError::invalid_shortcode(format!(
                        "Shortcode must be alphanumeric (1-32 characters): '{}'",
                        code
                    )));
                }
                if !self.links.is_free(code).await? {
                    return Err(EngineError::code_taken(format!(
                        "Shortcode '{}' already exists",
                        code
                    )));
                }
                Some(code.to_string())
            }
            None => None,
        };

        let created_at = self.clock.now();
        let expires_at = Duration::try_minutes(minutes)
            .and_then(|validity| created_at.checked_add_signed(validity))
            .ok_or_else(|| {
                EngineError::invalid_validity(format!("Validity of {} minutes is too large", minutes))
            })?;

        let record = match custom_code {
            Some(code) => {
                let record = LinkRecord {
                    code,
                    target_url,
                    created_at,
                    expires_at,
                };
                self.links.put(record.clone()).await?;
                record
            }
            None => {
                self.commit_generated(target_url, created_at, expires_at)
                    .await?
            }
        };

        info!(
            "LinkService: created '{}' -> '{}' (expires {})",
            record.code,
            record.target_url,
            record.expires_at.to_rfc3339()
        );
        self.notify(
            LogLevel::Info,
            &format!("Shortened URL: {} to {}", record.target_url, record.code),
        );

        Ok(self.created_link(record))
    }

    /// Draw candidates until one commits or the attempt budget runs out.
    async fn commit_generated(
        &self,
        target_url: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<LinkRecord> {
        let attempts = self.settings.max_generation_attempts;

        for attempt in 1..=attempts {
            let candidate = self.generator.next_code();
            if !is_valid_short_code(&candidate) {
                warn!("LinkService: generator produced invalid code '{}'", candidate);
                continue;
            }
            if !self.links.is_free(&candidate).await? {
                trace!(
                    "LinkService: candidate '{}' taken (attempt {})",
                    candidate, attempt
                );
                continue;
            }

            let record = LinkRecord {
                code: candidate,
                target_url: target_url.clone(),
                created_at,
                expires_at,
            };
            match self.links.put(record.clone()).await {
                Ok(()) => return Ok(record),
                // lost a race with a concurrent create
                Err(EngineError::CodeTaken(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        warn!("LinkService: no free code after {} attempts", attempts);
        Err(EngineError::generation_exhausted(format!(
            "No free short code after {} attempts",
            attempts
        )))
    }

    fn parse_validity(&self, raw: Option<&str>) -> Result<i64> {
        let raw = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => return Ok(self.settings.default_validity_minutes),
        };

        match raw.parse::<i64>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(EngineError::invalid_validity(format!(
                "Validity must be a positive integer, got '{}'",
                raw
            ))),
        }
    }

    fn created_link(&self, record: LinkRecord) -> CreatedLink {
        CreatedLink {
            short_link: format!(
                "{}/{}",
                self.settings.base_url.trim_end_matches('/'),
                record.code
            ),
            expires_display: format_expiry(&record.expires_at),
            code: record.code,
            target_url: record.target_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }

    // ============ Resolve ============

    /// Target URL of a live code; records a click without waiting for it.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        self.resolve_with(code, ClickContext::default()).await
    }

    pub async fn resolve_with(&self, code: &str, ctx: ClickContext) -> Result<String> {
        if !is_valid_short_code(code) {
            trace!("LinkService: malformed code rejected: {}", code);
            return Err(EngineError::not_found(format!("Shortcode '{}' not found", code)));
        }

        let Some(record) = self.links.get(code).await? else {
            debug!("LinkService: code not found: {}", code);
            self.notify(LogLevel::Error, &format!("Shortcode not found: {}", code));
            return Err(EngineError::not_found(format!("Shortcode '{}' not found", code)));
        };

        let now = self.clock.now();
        if !record.is_active_at(now) {
            debug!("LinkService: code expired: {}", code);
            self.notify(LogLevel::Warn, &format!("Expired shortcode: {}", code));
            return Err(EngineError::expired(format!(
                "Shortcode '{}' expired at {}",
                code,
                format_expiry(&record.expires_at)
            )));
        }

        let referrer = ctx
            .referrer
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        self.clicks.record(ClickEvent {
            code: record.code.clone(),
            timestamp: now,
            referrer,
            approx_location: resolve_location(self.location.as_ref(), &ctx),
        });

        self.notify(
            LogLevel::Info,
            &format!("Redirecting {} to {}", record.code, record.target_url),
        );
        Ok(record.target_url)
    }

    // ============ Report ============

    /// Every record joined with its clicks, plus aggregate counters.
    pub async fn report(&self) -> Result<LinkReport> {
        let events = self.clicks.events().await?;
        let records = self.links.all().await?;
        let now = self.clock.now();

        let total_clicks = events.len();
        let mut by_code: HashMap<String, Vec<ClickEvent>> = HashMap::new();
        for event in events {
            by_code.entry(event.code.clone()).or_default().push(event);
        }

        let links: Vec<LinkStats> = records
            .into_iter()
            .map(|record| {
                let clicks = by_code.remove(&record.code).unwrap_or_default();
                LinkStats {
                    is_active: record.is_active_at(now),
                    total_clicks: clicks.len(),
                    clicks,
                    code: record.code,
                    target_url: record.target_url,
                    created_at: record.created_at,
                    expires_at: record.expires_at,
                }
            })
            .collect();

        let active_links = links.iter().filter(|l| l.is_active).count();
        Ok(LinkReport {
            generated_at: now,
            unique_links: links.len(),
            active_links,
            total_clicks,
            links,
        })
    }
}
