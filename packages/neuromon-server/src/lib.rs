pub mod buffer;
pub mod config;
pub mod handlers;
pub mod relay;
pub mod schemas;
pub mod sessions;
pub mod state;
pub mod storage;

pub use buffer::{BatchWriter, BatchWriterConfig, BufferError, BufferStats, RecordSink};
pub use config::ServerConfig;
pub use relay::{ChannelSubscriber, EegBus, Subscriber};
pub use sessions::SessionTracker;
pub use state::ServerState;
