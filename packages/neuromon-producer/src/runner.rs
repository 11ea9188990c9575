//! The producer loop: acquire, preprocess, analyze, publish.

use std::time::{Duration, Instant};

use eeg_rs::{
    ArtifactAttenuator, CognitiveAnalyzer, CognitiveState, FeatureExtractor, FilterBank,
    FilterConfig,
};

use crate::cli::Cli;
use crate::client::{BackendClient, ClientError};
use crate::device::{FrameSource, CHANNEL_LABELS};
use crate::payload::build_payload;

/// Interval between console summary lines.
const SUMMARY_INTERVAL: Duration = Duration::from_secs(5);

/// Running totals surfaced in the periodic summary.
#[derive(Debug, Default)]
struct StreamCounters {
    sent: u64,
    errors: u64,
    device_errors: u64,
}

pub struct Producer {
    opts: Cli,
    source: Box<dyn FrameSource>,
    client: BackendClient,
    filter: FilterBank,
    attenuator: ArtifactAttenuator,
    extractor: FeatureExtractor,
    analyzer: CognitiveAnalyzer,
}

impl Producer {
    pub fn new(opts: Cli, source: Box<dyn FrameSource>) -> anyhow::Result<Self> {
        let filter_config = FilterConfig {
            notch: (opts.notch > 0.0).then_some(opts.notch),
            ..FilterConfig::driving()
        };
        let filter = FilterBank::new(opts.sample_rate, &filter_config)?;
        let client = BackendClient::new(&opts.backend_url)?;

        Ok(Self {
            extractor: FeatureExtractor::with_defaults(opts.sample_rate),
            analyzer: CognitiveAnalyzer::default(),
            attenuator: ArtifactAttenuator::default(),
            filter,
            client,
            source,
            opts,
        })
    }

    /// Run until the stream is interrupted. Returns an error only when
    /// the backend is unreachable at startup.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        self.client.wait_until_ready(self.opts.connect_retries).await?;

        if !self.opts.no_calibrate {
            self.calibrate().await;
        }

        log::info!(
            "Streaming session {} from {} source",
            self.opts.session_id,
            self.source.label()
        );

        let mut counters = StreamCounters::default();
        let mut last_summary = Instant::now();
        let mut last_state = CognitiveState::Unknown;
        let mut last_fatigue = 0.0_f64;
        let mut last_quality = 0.0_f64;
        let mut interrupt = Box::pin(tokio::signal::ctrl_c());

        loop {
            tokio::select! {
                _ = &mut interrupt => {
                    log::info!("Interrupt received, closing stream");
                    break;
                }
                chunk = self.source.pull_chunk(self.opts.chunk_duration) => {
                    let frame = match chunk {
                        Ok(frame) => frame,
                        Err(e) => {
                            // Device hiccups are skipped, not fatal
                            log::warn!("Device error: {}", e);
                            counters.device_errors += 1;
                            continue;
                        }
                    };
                    if let Err(e) = frame
                        .validate()
                        .and_then(|()| frame.check_channels(CHANNEL_LABELS.len()))
                    {
                        log::warn!("Dropping invalid frame: {}", e);
                        counters.device_errors += 1;
                        continue;
                    }

                    let filtered = self.filter.apply(&frame);
                    let clean = self.attenuator.process(&filtered);
                    let features = self.extractor.extract(&clean);
                    let result = self.analyzer.analyze(&features, clean.quality);

                    last_state = result.state;
                    last_quality = result.quality;
                    last_fatigue = result.scores.map(|s| s.fatigue * 100.0).unwrap_or(0.0);

                    let payload = build_payload(
                        self.opts.session_id,
                        self.opts.save_db,
                        &frame,
                        &features,
                        &result,
                    );
                    match self.client.post_stream(&payload).await {
                        Ok(ack) => {
                            counters.sent += 1;
                            log::debug!(
                                "Record accepted, {} clients notified",
                                ack.clients_notified
                            );
                        }
                        Err(e) => {
                            counters.errors += 1;
                            log::warn!("Failed to post record: {}", e);
                        }
                    }
                }
            }

            if last_summary.elapsed() >= SUMMARY_INTERVAL {
                println!(
                    "[{}] state={:<8} fatigue={:>5.1}% quality={:.2} sent={} errors={}",
                    chrono::Utc::now().format("%H:%M:%S"),
                    last_state.as_str(),
                    last_fatigue,
                    last_quality,
                    counters.sent,
                    counters.errors + counters.device_errors,
                );
                last_summary = Instant::now();
            }
        }

        self.source.close();
        log::info!(
            "Stream ended: {} records sent, {} post errors, {} device errors",
            counters.sent,
            counters.errors,
            counters.device_errors
        );
        Ok(())
    }

    /// Feed chunks into the analyzer until its baseline settles or the
    /// calibration window elapses.
    async fn calibrate(&mut self) {
        log::info!(
            "Calibrating baseline for up to {:.0}s, stay relaxed",
            self.opts.calibration_time
        );
        self.analyzer.start_calibration();
        let deadline = Instant::now() + Duration::from_secs_f64(self.opts.calibration_time);

        while Instant::now() < deadline {
            let frame = match self.source.pull_chunk(self.opts.chunk_duration).await {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Device error during calibration: {}", e);
                    continue;
                }
            };
            let filtered = self.filter.apply(&frame);
            let clean = self.attenuator.process(&filtered);
            let features = self.extractor.extract(&clean);
            if self.analyzer.add_calibration_sample(&features) {
                log::info!("Calibration complete");
                return;
            }
        }
        log::warn!("Calibration window elapsed before enough samples; using default baseline");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SyntheticHeadset;
    use clap::Parser;

    fn test_cli() -> Cli {
        Cli::parse_from([
            "neuromon-producer",
            "--session-id",
            "123e4567-e89b-12d3-a456-426614174000",
            "--no-calibrate",
        ])
    }

    #[test]
    fn test_producer_construction() {
        let opts = test_cli();
        let source = Box::new(SyntheticHeadset::new(opts.sample_rate, 5));
        assert!(Producer::new(opts, source).is_ok());
    }

    #[test]
    fn test_invalid_notch_rejected() {
        let mut opts = test_cli();
        // Notch above Nyquist must fail at construction
        opts.notch = 200.0;
        let source = Box::new(SyntheticHeadset::new(opts.sample_rate, 5));
        assert!(Producer::new(opts, source).is_err());
    }

    #[tokio::test]
    async fn test_pipeline_chunk_processing() {
        // Drive one chunk through the full pipeline without a backend
        let opts = test_cli();
        let mut source = SyntheticHeadset::new(opts.sample_rate, 5);
        let filter = FilterBank::new(opts.sample_rate, &FilterConfig::driving()).unwrap();
        let attenuator = ArtifactAttenuator::default();
        let mut extractor = FeatureExtractor::with_defaults(opts.sample_rate);
        let mut analyzer = CognitiveAnalyzer::default();

        let frame = source.pull_chunk(1.0).await.unwrap();
        let filtered = filter.apply(&frame);
        let clean = attenuator.process(&filtered);
        let features = extractor.extract(&clean);
        let result = analyzer.analyze(&features, clean.quality);

        assert_ne!(result.state, CognitiveState::Unknown);
        let payload = build_payload(opts.session_id, false, &frame, &features, &result);
        assert_eq!(payload.sample_rate, 256);
        assert!(payload.processed.signal_quality > 0.2);
    }
}
