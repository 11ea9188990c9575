use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use tracing::{info, warn};

use crate::buffer::RecordSink;
use crate::storage::traits::{EegRecordStore, StorageResult};
use crate::storage::types::EegRecord;

/// PostgreSQL/TimescaleDB implementation of EegRecordStore
pub struct PostgresEegStore {
    pool: PgPool,
}

impl PostgresEegStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attempt the TimescaleDB conversion. A plain PostgreSQL instance is
    /// still fully functional, so failures only warn.
    async fn create_hypertable(&self) {
        if let Err(e) = sqlx::query("CREATE EXTENSION IF NOT EXISTS timescaledb")
            .execute(&self.pool)
            .await
        {
            warn!("TimescaleDB extension unavailable, using plain table: {}", e);
            return;
        }

        match sqlx::query(
            r#"
            SELECT create_hypertable(
                'eeg_data',
                'timestamp',
                chunk_time_interval => INTERVAL '1 day',
                if_not_exists => TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        {
            Ok(_) => info!("eeg_data hypertable ready"),
            Err(e) => warn!("Could not create hypertable for eeg_data: {}", e),
        }
    }
}

#[async_trait]
impl EegRecordStore for PostgresEegStore {
    async fn initialize(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS eeg_data (
                id BIGSERIAL,
                session_id UUID NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                tp9 DOUBLE PRECISION NOT NULL,
                af7 DOUBLE PRECISION NOT NULL,
                af8 DOUBLE PRECISION NOT NULL,
                tp10 DOUBLE PRECISION NOT NULL,
                sample_rate INTEGER NOT NULL,
                theta_power DOUBLE PRECISION,
                alpha_power DOUBLE PRECISION,
                beta_power DOUBLE PRECISION,
                gamma_power DOUBLE PRECISION,
                theta_alpha_ratio DOUBLE PRECISION,
                beta_alpha_ratio DOUBLE PRECISION,
                fatigue_score DOUBLE PRECISION,
                cognitive_state TEXT,
                signal_quality DOUBLE PRECISION,
                PRIMARY KEY (id, timestamp)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        self.create_hypertable().await;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_eeg_session_timestamp
                ON eeg_data (session_id, timestamp)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_batch(&self, records: &[EegRecord]) -> StorageResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO eeg_data \
             (session_id, timestamp, tp9, af7, af8, tp10, sample_rate, \
              theta_power, alpha_power, beta_power, gamma_power, \
              theta_alpha_ratio, beta_alpha_ratio, fatigue_score, \
              cognitive_state, signal_quality) ",
        );
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.session_id)
                .push_bind(record.timestamp)
                .push_bind(record.tp9)
                .push_bind(record.af7)
                .push_bind(record.af8)
                .push_bind(record.tp10)
                .push_bind(record.sample_rate)
                .push_bind(record.theta_power)
                .push_bind(record.alpha_power)
                .push_bind(record.beta_power)
                .push_bind(record.gamma_power)
                .push_bind(record.theta_alpha_ratio)
                .push_bind(record.beta_alpha_ratio)
                .push_bind(record.fatigue_score)
                .push_bind(record.cognitive_state.as_deref())
                .push_bind(record.signal_quality);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RecordSink<EegRecord> for PostgresEegStore {
    async fn persist(&self, batch: &[EegRecord]) -> anyhow::Result<()> {
        let written = self.insert_batch(batch).await?;
        tracing::debug!(written, "persisted EEG batch");
        Ok(())
    }
}
