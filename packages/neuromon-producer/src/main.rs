use clap::Parser;

mod cli;
mod client;
mod device;
mod payload;
mod runner;

use cli::Cli;
use device::SyntheticHeadset;
use runner::Producer;

#[tokio::main]
async fn main() {
    let opts = Cli::parse();

    let log_level = match opts.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();

    let source = Box::new(SyntheticHeadset::new(
        opts.sample_rate,
        rand::random::<u64>(),
    ));

    let mut producer = match Producer::new(opts, source) {
        Ok(producer) => producer,
        Err(e) => {
            log::error!("Failed to initialize producer: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = producer.run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
