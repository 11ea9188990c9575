use clap::Parser;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "neuromon-producer",
    version,
    about = "Stream EEG frames through the cognitive analysis pipeline to a NeuroMon backend",
    long_about = "Acquires multichannel EEG frames, filters them, extracts spectral\n\
                  features, classifies the cognitive state, and posts one record per\n\
                  chunk to the backend ingestion endpoint."
)]
pub struct Cli {
    /// UUID of the active monitoring session
    #[arg(long)]
    pub session_id: Uuid,

    /// Backend base URL
    #[arg(long, default_value = "http://localhost:8000")]
    pub backend_url: String,

    /// Ask the backend to persist each record
    #[arg(long)]
    pub save_db: bool,

    /// Skip the baseline calibration phase
    #[arg(long)]
    pub no_calibrate: bool,

    /// Maximum calibration duration in seconds
    #[arg(long, default_value_t = 10.0)]
    pub calibration_time: f64,

    /// Acquisition sample rate in Hz
    #[arg(long, default_value_t = 256.0)]
    pub sample_rate: f64,

    /// Seconds of data per processed chunk
    #[arg(long, default_value_t = 1.0)]
    pub chunk_duration: f64,

    /// Powerline notch frequency in Hz (0 disables the notch)
    #[arg(long, default_value_t = 50.0)]
    pub notch: f64,

    /// Backend connection attempts before giving up at startup
    #[arg(long, default_value_t = 5)]
    pub connect_retries: u32,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
