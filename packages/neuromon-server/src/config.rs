use std::env;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind address (0.0.0.0 for LAN, 127.0.0.1 for localhost)
    pub bind_addr: String,
    /// PostgreSQL / TimescaleDB database URL
    pub database_url: String,
    /// Batch writer flushes when the buffer reaches this many records
    pub buffer_max_size: usize,
    /// Batch writer flushes after this many milliseconds regardless of size
    pub buffer_max_time_ms: u64,
    /// Seconds after which a silent session is dropped from the liveness map
    pub session_stale_seconds: i64,
    /// CORS allowed origins (comma-separated in env var)
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        Ok(Self {
            port: env::var("NEUROMON_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            bind_addr: env::var("NEUROMON_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            database_url,
            buffer_max_size: env::var("EEG_BUFFER_MAX_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            buffer_max_time_ms: env::var("EEG_BUFFER_MAX_TIME_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            session_stale_seconds: env::var("SESSION_STALE_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:3000".to_string(),
                        "http://127.0.0.1:3000".to_string(),
                    ]
                }),
        })
    }

    /// Get the full bind address (addr:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: "0.0.0.0".to_string(),
            database_url: String::new(),
            buffer_max_size: 100,
            buffer_max_time_ms: 1000,
            session_stale_seconds: 300,
            cors_origins: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
