//! Size-or-time triggered batch writer for high-frequency records.
//!
//! Records arrive at hundreds of Hz and are persisted in amortized-large
//! batches: a flush fires when the buffer reaches `max_size` or when
//! `max_time` has elapsed since the last flush, whichever comes first.
//! Failed flushes re-prepend their snapshot so no record is silently lost.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Persist capability handed to the batch writer.
#[async_trait]
pub trait RecordSink<T>: Send + Sync {
    async fn persist(&self, batch: &[T]) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("batch writer is stopped")]
    Stopped,
    #[error("flush failed: {0}")]
    Flush(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct BatchWriterConfig {
    /// Buffer size that triggers an immediate flush
    pub max_size: usize,
    /// Maximum age of the oldest unflushed record
    pub max_time: Duration,
    /// Name used in log lines
    pub name: String,
}

impl Default for BatchWriterConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            max_time: Duration::from_secs(1),
            name: "eeg-buffer".to_string(),
        }
    }
}

/// Statistics snapshot for the buffer stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BufferStats {
    pub current_size: usize,
    pub max_size: usize,
    pub max_time_seconds: f64,
    pub total_items_processed: u64,
    pub total_flushes: u64,
    pub avg_items_per_flush: f64,
    pub time_since_last_flush: f64,
    pub is_running: bool,
}

struct BufferState<T> {
    items: Vec<T>,
    last_flush: Instant,
    total_items: u64,
    total_flushes: u64,
}

/// Batch writer with a background ticker for time-based flushing.
///
/// All buffer mutation happens under one async mutex held only around
/// append/snapshot/replace; the sink call runs outside it. A separate
/// flush gate keeps exactly one flush in progress at any instant.
pub struct BatchWriter<T> {
    config: BatchWriterConfig,
    sink: Arc<dyn RecordSink<T>>,
    state: Mutex<BufferState<T>>,
    flush_gate: Mutex<()>,
    running: AtomicBool,
    stopped: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
    ticker: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> BatchWriter<T> {
    pub fn new(config: BatchWriterConfig, sink: Arc<dyn RecordSink<T>>) -> Arc<Self> {
        let (shutdown_tx, _) = watch::channel(false);
        info!(
            name = %config.name,
            max_size = config.max_size,
            max_time_ms = config.max_time.as_millis() as u64,
            "batch writer initialized"
        );
        Arc::new(Self {
            config,
            sink,
            state: Mutex::new(BufferState {
                items: Vec::new(),
                last_flush: Instant::now(),
                total_items: 0,
                total_flushes: 0,
            }),
            flush_gate: Mutex::new(()),
            running: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            shutdown_tx,
            ticker: parking_lot::Mutex::new(None),
        })
    }

    /// Launch the background ticker for time-based flushing.
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!(name = %self.config.name, "batch writer already running");
            return;
        }

        let writer = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(100));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let due = {
                            let state = writer.state.lock().await;
                            !state.items.is_empty()
                                && state.last_flush.elapsed() >= writer.config.max_time
                        };
                        if due {
                            if let Err(err) = writer.flush().await {
                                error!(name = %writer.config.name, %err, "time-based flush failed");
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        *self.ticker.lock() = Some(handle);
        info!(name = %self.config.name, "batch writer started");
    }

    /// Cancel the ticker, await its termination, and flush what remains.
    /// Records added concurrently with stop are either flushed here or
    /// surface `BufferError::Stopped` to their caller.
    pub async fn stop(&self) -> Result<usize, BufferError> {
        self.stopped.store(true, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(true);

        let handle = self.ticker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        let flushed = self.flush().await?;
        info!(name = %self.config.name, flushed, "batch writer stopped");
        Ok(flushed)
    }

    /// Append one record; flushes synchronously when the buffer reaches
    /// `max_size`. Returns true when a flush occurred.
    pub async fn add(&self, item: T) -> Result<bool, BufferError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BufferError::Stopped);
        }

        let should_flush = {
            let mut state = self.state.lock().await;
            state.items.push(item);
            state.items.len() >= self.config.max_size
        };

        if should_flush {
            self.flush().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Bulk append with the same size-triggered flush semantics.
    pub async fn add_many(&self, items: Vec<T>) -> Result<bool, BufferError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(BufferError::Stopped);
        }

        let should_flush = {
            let mut state = self.state.lock().await;
            state.items.extend(items);
            state.items.len() >= self.config.max_size
        };

        if should_flush {
            self.flush().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Flush the buffer through the sink. Returns the number of records
    /// written; a failed sink re-prepends the snapshot and propagates.
    pub async fn flush(&self) -> Result<usize, BufferError> {
        let _gate = self.flush_gate.lock().await;

        let mut batch = {
            let mut state = self.state.lock().await;
            if state.items.is_empty() {
                return Ok(0);
            }
            state.last_flush = Instant::now();
            std::mem::take(&mut state.items)
        };
        let count = batch.len();

        // Sink call happens outside the buffer critical section
        if let Err(err) = self.sink.persist(&batch).await {
            let mut state = self.state.lock().await;
            batch.extend(state.items.drain(..));
            state.items = batch;
            return Err(BufferError::Flush(err));
        }

        let mut state = self.state.lock().await;
        state.total_items += count as u64;
        state.total_flushes += 1;
        debug!(
            name = %self.config.name,
            count,
            total = state.total_items,
            "flushed batch"
        );
        Ok(count)
    }

    pub async fn stats(&self) -> BufferStats {
        let state = self.state.lock().await;
        let avg = if state.total_flushes > 0 {
            state.total_items as f64 / state.total_flushes as f64
        } else {
            0.0
        };
        BufferStats {
            current_size: state.items.len(),
            max_size: self.config.max_size,
            max_time_seconds: self.config.max_time.as_secs_f64(),
            total_items_processed: state.total_items,
            total_flushes: state.total_flushes,
            avg_items_per_flush: avg,
            time_since_last_flush: state.last_flush.elapsed().as_secs_f64(),
            is_running: self.running.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Sink recording every batch it receives.
    struct MemorySink {
        batches: Mutex<Vec<Vec<u32>>>,
    }

    impl MemorySink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(Vec::new()),
            })
        }

        async fn flattened(&self) -> Vec<u32> {
            self.batches.lock().await.iter().flatten().copied().collect()
        }
    }

    #[async_trait]
    impl RecordSink<u32> for MemorySink {
        async fn persist(&self, batch: &[u32]) -> anyhow::Result<()> {
            self.batches.lock().await.push(batch.to_vec());
            Ok(())
        }
    }

    /// Sink failing the first `failures` persist calls.
    struct FlakySink {
        inner: Arc<MemorySink>,
        remaining_failures: AtomicUsize,
    }

    #[async_trait]
    impl RecordSink<u32> for FlakySink {
        async fn persist(&self, batch: &[u32]) -> anyhow::Result<()> {
            if self
                .remaining_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                anyhow::bail!("simulated persistence failure");
            }
            self.inner.persist(batch).await
        }
    }

    fn small_config(max_size: usize, max_time_ms: u64) -> BatchWriterConfig {
        BatchWriterConfig {
            max_size,
            max_time: Duration::from_millis(max_time_ms),
            name: "test-buffer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_flush_by_size() {
        let sink = MemorySink::new();
        let writer = BatchWriter::new(small_config(3, 10_000), sink.clone());

        assert!(!writer.add(1).await.unwrap());
        assert!(!writer.add(2).await.unwrap());
        // Third add crosses the threshold and flushes exactly those items
        assert!(writer.add(3).await.unwrap());

        let batches = sink.batches.lock().await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![1, 2, 3]);
        drop(batches);

        let stats = writer.stats().await;
        assert_eq!(stats.current_size, 0);
        assert_eq!(stats.total_flushes, 1);
        assert_eq!(stats.total_items_processed, 3);
    }

    #[tokio::test]
    async fn test_flush_by_time() {
        let sink = MemorySink::new();
        let writer = BatchWriter::new(small_config(1000, 200), sink.clone());
        writer.start();

        writer.add(7).await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(sink.flattened().await, vec![7]);
        writer.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_no_loss_on_stop() {
        let sink = MemorySink::new();
        let writer = BatchWriter::new(small_config(100, 10_000), sink.clone());
        writer.start();

        for i in 0..42 {
            writer.add(i).await.unwrap();
        }
        writer.stop().await.unwrap();

        assert_eq!(sink.flattened().await, (0..42).collect::<Vec<u32>>());
        assert!(matches!(writer.add(99).await, Err(BufferError::Stopped)));
    }

    #[tokio::test]
    async fn test_failed_flush_reprepends() {
        let inner = MemorySink::new();
        let sink = Arc::new(FlakySink {
            inner: inner.clone(),
            remaining_failures: AtomicUsize::new(1),
        });
        let writer = BatchWriter::new(small_config(100, 10_000), sink);

        writer.add_many(vec![1, 2, 3]).await.unwrap();
        assert!(writer.flush().await.is_err());

        // Records added after the failure stay behind the snapshot
        writer.add(4).await.unwrap();
        let stats = writer.stats().await;
        assert_eq!(stats.current_size, 4);

        let flushed = writer.flush().await.unwrap();
        assert_eq!(flushed, 4);
        assert_eq!(inner.flattened().await, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_manual_flush_returns_count() {
        let sink = MemorySink::new();
        let writer = BatchWriter::new(small_config(100, 10_000), sink.clone());

        writer.add_many(vec![1, 2]).await.unwrap();
        assert_eq!(writer.flush().await.unwrap(), 2);
        assert_eq!(writer.flush().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats_shape() {
        let sink = MemorySink::new();
        let writer = BatchWriter::new(small_config(10, 1000), sink);

        let stats = writer.stats().await;
        assert_eq!(stats.current_size, 0);
        assert_eq!(stats.total_flushes, 0);
        assert_eq!(stats.avg_items_per_flush, 0.0);
        assert!(!stats.is_running);

        writer.add(1).await.unwrap();
        let stats = writer.stats().await;
        assert_eq!(stats.current_size, 1);
    }
}
