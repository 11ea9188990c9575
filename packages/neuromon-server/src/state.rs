use std::sync::Arc;
use std::time::Instant;

use crate::buffer::{BatchWriter, BatchWriterConfig, RecordSink};
use crate::config::ServerConfig;
use crate::relay::EegBus;
use crate::sessions::SessionTracker;
use crate::storage::EegRecord;

/// Main server state shared across all handlers
pub struct ServerState {
    pub config: ServerConfig,
    pub bus: Arc<EegBus>,
    pub writer: Arc<BatchWriter<EegRecord>>,
    pub sessions: SessionTracker,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig, sink: Arc<dyn RecordSink<EegRecord>>) -> Self {
        let writer_config = BatchWriterConfig {
            max_size: config.buffer_max_size,
            max_time: std::time::Duration::from_millis(config.buffer_max_time_ms),
            name: "eeg-buffer".to_string(),
        };
        let writer = BatchWriter::new(writer_config, sink);

        Self {
            config,
            bus: Arc::new(EegBus::new()),
            writer,
            sessions: SessionTracker::new(),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
