//! LinkService tests
//!
//! Creation, resolution and reporting against the in-memory backend with a
//! fixed clock.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use lapselink::analytics::StaticLocation;
use lapselink::errors::{EngineError, Result};
use lapselink::services::{
    Clock, CodeGenerator, CreateLinkRequest, FixedClock, LinkService, LinkSettings, LogLevel,
    LogSink,
};
use lapselink::storage::{MemoryBackend, StorageBackend, Table};

// =============================================================================
// Test Setup
// =============================================================================

fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn create_test_service() -> (LinkService, Arc<FixedClock>) {
    create_service_with(Arc::new(MemoryBackend::new()), LinkSettings::default())
}

fn create_service_with(
    backend: Arc<dyn StorageBackend>,
    settings: LinkSettings,
) -> (LinkService, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(start_time()));
    let service = LinkService::from_backend(backend, settings, 64)
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
    (service, clock)
}

/// Hands out a fixed list of candidates, then repeats the last one
struct SequenceGenerator {
    codes: Mutex<Vec<String>>,
}

impl SequenceGenerator {
    fn new(codes: &[&str]) -> Self {
        let mut codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        codes.reverse();
        Self {
            codes: Mutex::new(codes),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn next_code(&self) -> String {
        let mut codes = self.codes.lock();
        if codes.len() > 1 {
            codes.pop().unwrap_or_default()
        } else {
            codes.last().cloned().unwrap_or_default()
        }
    }
}

/// Memory backend whose click table always fails
struct BrokenClicksBackend {
    inner: MemoryBackend,
}

#[async_trait]
impl StorageBackend for BrokenClicksBackend {
    async fn get(&self, table: Table, key: &str) -> Result<Option<Value>> {
        self.inner.get(table, key).await
    }

    async fn put(&self, table: Table, key: &str, value: Value) -> Result<()> {
        self.inner.put(table, key, value).await
    }

    async fn append(&self, table: Table, key: &str, value: Value) -> Result<()> {
        if table == Table::Clicks {
            return Err(EngineError::storage("click log unavailable"));
        }
        self.inner.append(table, key, value).await
    }

    async fn scan(&self, table: Table) -> Result<Vec<(String, Value)>> {
        self.inner.scan(table).await
    }

    fn backend_name(&self) -> &'static str {
        "broken-clicks"
    }
}

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl LogSink for CollectingSink {
    fn log(&self, _stack: &str, level: LogLevel, _package: &str, message: &str) {
        self.entries.lock().push((level, message.to_string()));
    }
}

// =============================================================================
// Create Tests
// =============================================================================

#[tokio::test]
async fn test_generated_codes_are_unique() {
    let (service, _) = create_test_service();
    let mut seen = HashSet::new();

    for i in 0..100 {
        let link = service
            .create(CreateLinkRequest::new(format!("https://example.com/{}", i)))
            .await
            .unwrap();
        assert_eq!(link.code.len(), 6);
        assert!(link.code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(seen.insert(link.code), "code issued twice");
    }
    assert_eq!(service.link_store().len().await.unwrap(), 100);
}

#[tokio::test]
async fn test_custom_code_twice_is_taken() {
    let (service, _) = create_test_service();
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("promo"))
        .await
        .unwrap();

    let err = service
        .create(CreateLinkRequest::new("https://b.com").with_custom_code("promo"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CodeTaken(_)));

    let record = service.link_store().get("promo").await.unwrap().unwrap();
    assert_eq!(record.target_url, "https://a.com/");
}

#[tokio::test]
async fn test_expired_custom_code_stays_taken() {
    let (service, clock) = create_test_service();
    service
        .create(
            CreateLinkRequest::new("https://a.com")
                .with_custom_code("old")
                .with_validity(1),
        )
        .await
        .unwrap();
    clock.advance(Duration::minutes(10));

    let err = service
        .create(CreateLinkRequest::new("https://b.com").with_custom_code("old"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::CodeTaken(_)));
}

#[tokio::test]
async fn test_expires_at_is_exact() {
    let (service, _) = create_test_service();
    let link = service
        .create(CreateLinkRequest::new("https://a.com").with_validity(45))
        .await
        .unwrap();
    assert_eq!(link.created_at, start_time());
    assert_eq!(link.expires_at - link.created_at, Duration::seconds(45 * 60));

    let default = service
        .create(CreateLinkRequest::new("https://b.com"))
        .await
        .unwrap();
    assert_eq!(
        default.expires_at - default.created_at,
        Duration::minutes(30)
    );
}

#[tokio::test]
async fn test_invalid_inputs() {
    let (service, _) = create_test_service();

    let err = service
        .create(CreateLinkRequest::new("not a url"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidUrl(_)));

    let err = service
        .create(CreateLinkRequest::new("javascript:alert(1)"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidUrl(_)));

    for validity in ["0", "-5", "ten", "2.5"] {
        let err = service
            .create(CreateLinkRequest::new("https://a.com").with_validity(validity))
            .await
            .unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidValidity(_)),
            "validity {} accepted",
            validity
        );
    }

    for code in ["ab-1", "a b", "ab_1", "ünï"] {
        let err = service
            .create(CreateLinkRequest::new("https://a.com").with_custom_code(code))
            .await
            .unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidShortcode(_)),
            "code {} accepted",
            code
        );
    }

    assert_eq!(service.link_store().len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_url_checked_before_validity_and_code() {
    let (service, _) = create_test_service();
    let err = service
        .create(
            CreateLinkRequest::new("nope")
                .with_validity("-1")
                .with_custom_code("bad code"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidUrl(_)));

    let err = service
        .create(
            CreateLinkRequest::new("https://a.com")
                .with_validity("-1")
                .with_custom_code("bad code"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValidity(_)));
}

#[tokio::test]
async fn test_generator_retries_past_taken_codes() {
    let (service, _) = create_test_service();
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("aaa"))
        .await
        .unwrap();

    let service = service.with_generator(Arc::new(SequenceGenerator::new(&["aaa", "aaa", "bbb"])));
    let link = service
        .create(CreateLinkRequest::new("https://b.com"))
        .await
        .unwrap();
    assert_eq!(link.code, "bbb");
}

#[tokio::test]
async fn test_api_code_is_reserved() {
    let (service, _) = create_test_service();
    let err = service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("api"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidShortcode(_)));

    let service = service.with_generator(Arc::new(SequenceGenerator::new(&["api", "ok1"])));
    let link = service
        .create(CreateLinkRequest::new("https://b.com"))
        .await
        .unwrap();
    assert_eq!(link.code, "ok1");
    assert!(service.link_store().get("api").await.unwrap().is_none());
}

#[tokio::test]
async fn test_generation_exhausted() {
    let settings = LinkSettings {
        max_generation_attempts: 3,
        ..LinkSettings::default()
    };
    let (service, _) = create_service_with(Arc::new(MemoryBackend::new()), settings);
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("dup"))
        .await
        .unwrap();

    let service = service.with_generator(Arc::new(SequenceGenerator::new(&["dup"])));
    let err = service
        .create(CreateLinkRequest::new("https://b.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::GenerationExhausted(_)));
    assert_eq!(service.link_store().len().await.unwrap(), 1);
}

// =============================================================================
// Batch Tests
// =============================================================================

#[tokio::test]
async fn test_batch_skips_blank_entries() {
    let (service, _) = create_test_service();
    let requests = vec![
        CreateLinkRequest::new("https://a.com"),
        CreateLinkRequest::new(""),
        CreateLinkRequest::new("https://b.com").with_custom_code("ab1"),
    ];

    let created = service.create_batch(&requests, 5).await.unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].target_url, "https://a.com/");
    assert_eq!(created[1].code, "ab1");
    assert_eq!(created[1].target_url, "https://b.com/");
}

#[tokio::test]
async fn test_batch_too_large_creates_nothing() {
    let (service, _) = create_test_service();
    let requests: Vec<CreateLinkRequest> = (0..6)
        .map(|i| CreateLinkRequest::new(format!("https://example.com/{}", i)))
        .collect();

    let err = service.create_batch(&requests, 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::TooManyRequests(_)));
    assert_eq!(err.index, None);
    assert_eq!(service.link_store().len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_batch_all_blank() {
    let (service, _) = create_test_service();
    let requests = vec![CreateLinkRequest::new(""), CreateLinkRequest::new("   ")];

    let err = service.create_batch(&requests, 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::NoValidRequests(_)));

    let err = service.create_batch(&[], 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::NoValidRequests(_)));
}

#[tokio::test]
async fn test_batch_failure_keeps_earlier_commits() {
    let (service, _) = create_test_service();
    let requests = vec![
        CreateLinkRequest::new("https://a.com").with_custom_code("first"),
        CreateLinkRequest::new("https://b.com").with_validity("-5"),
        CreateLinkRequest::new("https://c.com").with_custom_code("third"),
    ];

    let err = service.create_batch(&requests, 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::InvalidValidity(_)));
    assert_eq!(err.index, Some(2));

    let store = service.link_store();
    assert!(store.get("first").await.unwrap().is_some());
    assert!(store.get("third").await.unwrap().is_none());
    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_batch_index_counts_blank_entries() {
    let (service, _) = create_test_service();
    let requests = vec![
        CreateLinkRequest::new(""),
        CreateLinkRequest::new("ftp//broken"),
    ];

    let err = service.create_batch(&requests, 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::InvalidUrl(_)));
    assert_eq!(err.index, Some(2));
}

#[tokio::test]
async fn test_batch_duplicate_custom_code_in_same_batch() {
    let (service, _) = create_test_service();
    let requests = vec![
        CreateLinkRequest::new("https://a.com").with_custom_code("same"),
        CreateLinkRequest::new("https://b.com").with_custom_code("same"),
    ];

    let err = service.create_batch(&requests, 5).await.unwrap_err();
    assert!(matches!(err.error, EngineError::CodeTaken(_)));
    assert_eq!(err.index, Some(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_commits_once() {
    let (service, _) = create_test_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create(
                        CreateLinkRequest::new(format!("https://example.com/{}", i))
                            .with_custom_code("race"),
                    )
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert!(matches!(e, EngineError::CodeTaken(_))),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(service.link_store().len().await.unwrap(), 1);
}

// =============================================================================
// Resolve Tests
// =============================================================================

#[tokio::test]
async fn test_resolve_around_expiry() {
    let (service, clock) = create_test_service();
    let link = service
        .create(
            CreateLinkRequest::new("https://a.com")
                .with_custom_code("soon")
                .with_validity(10),
        )
        .await
        .unwrap();

    clock.set(link.expires_at - Duration::seconds(1));
    assert_eq!(service.resolve("soon").await.unwrap(), "https://a.com/");

    clock.set(link.expires_at);
    assert!(matches!(
        service.resolve("soon").await,
        Err(EngineError::Expired(_))
    ));

    clock.set(link.expires_at + Duration::seconds(1));
    assert!(matches!(
        service.resolve("soon").await,
        Err(EngineError::Expired(_))
    ));

    // only the live resolution counted
    let events = service.click_recorder().events_for("soon").await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_location_provider_fills_unhinted_clicks() {
    let (service, _) = create_test_service();
    let service = service.with_location_provider(Arc::new(StaticLocation("Berlin, DE".into())));
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("loc"))
        .await
        .unwrap();
    service.resolve("loc").await.unwrap();

    let events = service.click_recorder().events_for("loc").await.unwrap();
    assert_eq!(events[0].approx_location, "Berlin, DE");
}

#[tokio::test]
async fn test_resolve_unknown_records_nothing() {
    let (service, _) = create_test_service();
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("known"))
        .await
        .unwrap();

    for code in ["missing", "", "not/valid", "known2"] {
        assert!(matches!(
            service.resolve(code).await,
            Err(EngineError::NotFound(_))
        ));
    }

    assert_eq!(service.click_recorder().pending(), 0);
    assert!(service.click_recorder().events().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_click_failure_does_not_fail_resolve() {
    let backend = Arc::new(BrokenClicksBackend {
        inner: MemoryBackend::new(),
    });
    let (service, _) = create_service_with(backend, LinkSettings::default());
    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("ok"))
        .await
        .unwrap();

    for _ in 0..3 {
        assert_eq!(service.resolve("ok").await.unwrap(), "https://a.com/");
    }
    // flush fails, events stay buffered
    assert_eq!(service.click_recorder().flush().await, 0);
    assert_eq!(service.click_recorder().pending(), 3);
}

#[tokio::test]
async fn test_notifier_receives_events() {
    let sink = Arc::new(CollectingSink::default());
    let (service, _) = create_test_service();
    let service = service.with_notifier(Arc::clone(&sink) as Arc<dyn LogSink>);

    service
        .create(CreateLinkRequest::new("https://a.com").with_custom_code("note"))
        .await
        .unwrap();
    service.resolve("note").await.unwrap();
    let _ = service.resolve("nothing").await;

    let entries = sink.entries.lock();
    assert!(entries.iter().any(|(level, _)| *level == LogLevel::Info));
    assert!(
        entries
            .iter()
            .any(|(level, msg)| *level == LogLevel::Error && msg.contains("nothing"))
    );
}

// =============================================================================
// Report Tests
// =============================================================================

#[tokio::test]
async fn test_report_aggregates() {
    let (service, clock) = create_test_service();
    for (code, validity) in [("one", 5), ("two", 60), ("three", 60)] {
        service
            .create(
                CreateLinkRequest::new(format!("https://{}.example", code))
                    .with_custom_code(code)
                    .with_validity(validity),
            )
            .await
            .unwrap();
    }

    for _ in 0..2 {
        service.resolve("one").await.unwrap();
    }
    service.resolve("two").await.unwrap();

    clock.advance(Duration::minutes(10));
    service.resolve("two").await.unwrap();

    let report = service.report().await.unwrap();
    assert_eq!(report.unique_links, 3);
    assert_eq!(report.total_clicks, 4);
    assert_eq!(
        report.total_clicks,
        report.links.iter().map(|l| l.total_clicks).sum::<usize>()
    );
    assert_eq!(report.active_links, 2);
    assert_eq!(
        report.active_links,
        report
            .links
            .iter()
            .filter(|l| l.expires_at > report.generated_at)
            .count()
    );

    // insertion order
    let codes: Vec<&str> = report.links.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["one", "two", "three"]);

    let one = &report.links[0];
    assert!(!one.is_active);
    assert_eq!(one.total_clicks, 2);
    assert!(one.clicks.iter().all(|c| c.code == "one"));
    assert_eq!(report.links[2].total_clicks, 0);
}

#[tokio::test]
async fn test_report_empty() {
    let (service, _) = create_test_service();
    let report = service.report().await.unwrap();
    assert!(report.links.is_empty());
    assert_eq!(report.total_clicks, 0);
    assert_eq!(report.unique_links, 0);
    assert_eq!(report.active_links, 0);
}
