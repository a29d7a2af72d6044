mod config;
mod gateway;
mod meter;
mod mqtt;
mod protocol;
mod publish;
mod serial;
mod tracker;

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::thread;
use std::time::Duration;

use crate::tracker::ChangeTracker;

/// Pause between polling cycles, applied unconditionally: a degraded cycle
/// sleeps the same as a healthy one.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn main() -> Result<()> {
    env_logger::init();

    let config = config::Config::parse();
    info!("Starting dds238mon, polling {}", config.device);

    let mut publisher = publish::from_config(&config)?;
    let mut tracker = ChangeTracker::new();

    loop {
        let frame = match serial::exchange(&config.device) {
            Ok(frame) => frame,
            Err(e) => {
                error!("Serial exchange failed: {}", e);
                Vec::new()
            }
        };

        let reading = protocol::decode(&frame);

        for (metric, value) in tracker.changed(&reading) {
            if let Err(e) = publisher.publish(metric, value) {
                error!("Failed to publish {}: {}", metric.name(), e);
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}
