//! 点击事件记录器
//!
//! `record` only pushes into an in-memory buffer and never fails; events
//! reach the `clicks` table on the next flush, which is triggered:
//! - when the buffer reaches `max_buffered` (spawned, not awaited)
//! - by the periodic background task of the server host
//! - explicitly, e.g. before building a report
//!
//! A failed flush puts the events back at the front of the buffer. The
//! buffer holds at most `PENDING_LIMIT_FACTOR * max_buffered` events; past
//! that the oldest ones are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};
use tracing::{debug, trace, warn};

use crate::errors::Result;
use crate::storage::{ClickEvent, StorageBackend, Table};

/// Pending events kept per unit of `max_buffered` while storage is failing
pub const PENDING_LIMIT_FACTOR: usize = 16;

struct ClickBuffer {
    events: SyncMutex<Vec<ClickEvent>>,
    capacity: usize,
    /// 刷盘锁，防止并发刷盘
    flush_lock: Mutex<()>,
    /// 是否有 flush 任务待处理（防止重复 spawn）
    flush_pending: AtomicBool,
}

impl ClickBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            events: SyncMutex::new(Vec::new()),
            capacity,
            flush_lock: Mutex::new(()),
            flush_pending: AtomicBool::new(false),
        }
    }

    fn push(&self, event: ClickEvent) -> usize {
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            let excess = events.len() + 1 - self.capacity;
            events.drain(..excess);
            debug!("ClickRecorder: buffer full, dropped {} oldest clicks", excess);
        }
        events.push(event);
        events.len()
    }

    fn drain(&self) -> Vec<ClickEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Put failed events back ahead of anything recorded meanwhile.
    ///
    /// Returns how many of the oldest events were dropped to stay within
    /// capacity.
    fn restore(&self, mut failed: Vec<ClickEvent>) -> usize {
        let mut events = self.events.lock();
        failed.append(&mut events);
        let excess = failed.len().saturating_sub(self.capacity);
        if excess > 0 {
            failed.drain(..excess);
        }
        *events = failed;
        excess
    }

    fn len(&self) -> usize {
        self.events.lock().len()
    }
}

/// Append-only click log keyed by code.
#[derive(Clone)]
pub struct ClickRecorder {
    backend: Arc<dyn StorageBackend>,
    buffer: Arc<ClickBuffer>,
    max_buffered: usize,
}

impl ClickRecorder {
    pub fn new(backend: Arc<dyn StorageBackend>, max_buffered: usize) -> Self {
        let max_buffered = max_buffered.max(1);
        Self {
            backend,
            buffer: Arc::new(ClickBuffer::new(
                max_buffered.saturating_mul(PENDING_LIMIT_FACTOR),
            )),
            max_buffered,
        }
    }

    /// Buffer one event. Never blocks on storage and never fails.
    pub fn record(&self, event: ClickEvent) {
        trace!("ClickRecorder: buffered click for '{}'", event.code);
        let buffered = self.buffer.push(event);

        if buffered < self.max_buffered {
            return;
        }

        // 只有成功将 flush_pending 从 false 设为 true 的调用才 spawn
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            trace!("ClickRecorder: no runtime, deferring flush");
            return;
        };
        if self
            .buffer
            .flush_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok()
        {
            let recorder = self.clone();
            handle.spawn(async move {
                recorder.flush().await;
                recorder
                    .buffer
                    .flush_pending
                    .store(false, Ordering::Release);
            });
        }
    }

    /// Events recorded but not yet persisted.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Most events held in memory while waiting for storage.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity
    }

    fn restore(&self, events: Vec<ClickEvent>) {
        let dropped = self.buffer.restore(events);
        if dropped > 0 {
            warn!(
                "ClickRecorder: buffer over capacity ({}), dropped {} oldest clicks",
                self.buffer.capacity, dropped
            );
        }
    }

    /// Persist buffered events, logging and swallowing any failure.
    ///
    /// Returns how many events were written.
    pub async fn flush(&self) -> usize {
        match self.try_flush().await {
            Ok(count) => count,
            Err(e) => {
                warn!("ClickRecorder: flush failed, events kept in buffer: {}", e);
                0
            }
        }
    }

    /// Persist buffered events, returning the storage error on failure.
    pub async fn try_flush(&self) -> Result<usize> {
        let _guard = self.buffer.flush_lock.lock().await;

        let events = self.buffer.drain();
        if events.is_empty() {
            trace!("ClickRecorder: no clicks to flush");
            return Ok(0);
        }

        let serialized: serde_json::Result<Vec<(String, serde_json::Value)>> = events
            .iter()
            .map(|event| serde_json::to_value(event).map(|value| (event.code.clone(), value)))
            .collect();
        let entries = match serialized {
            Ok(entries) => entries,
            Err(e) => {
                self.restore(events);
                return Err(e.into());
            }
        };

        let count = entries.len();
        match self.backend.append_batch(Table::Clicks, entries).await {
            Ok(()) => {
                debug!("ClickRecorder: flushed {} clicks", count);
                Ok(count)
            }
            Err(e) => {
                self.restore(events);
                Err(e)
            }
        }
    }

    /// All persisted events, in recording order, after a best-effort flush.
    pub async fn events(&self) -> Result<Vec<ClickEvent>> {
        self.flush().await;
        self.backend
            .scan(Table::Clicks)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }

    pub async fn events_for(&self, code: &str) -> Result<Vec<ClickEvent>> {
        Ok(self
            .events()
            .await?
            .into_iter()
            .filter(|event| event.code == code)
            .collect())
    }

    /// 启动后台刷盘任务（作为异步方法运行）
    pub async fn start_background_task(&self, interval: Duration) {
        loop {
            sleep(interval).await;

            if self.pending() == 0 {
                continue;
            }
            debug!("ClickRecorder: triggering scheduled flush");
            self.flush().await;
        }
    }
}
