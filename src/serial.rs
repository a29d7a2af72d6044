use anyhow::{Context, Result};
use log::debug;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use crate::protocol::{REQUEST_FRAME, RESPONSE_LEN};

pub const BAUD_RATE: u32 = 9600;

/// Bounds each read; a meter that stays silent costs at most this per cycle.
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Perform one request/response exchange with the meter. The port is opened,
/// used, and closed within this call; it is never held across cycles.
///
/// A short read is not an error: the timeout cuts it off and the returned
/// buffer is simply shorter than a complete frame, which the decoder treats
/// as the meter being offline for this cycle.
pub fn exchange(device: &str) -> Result<Vec<u8>> {
    let mut port = serialport::new(device, BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("Failed to open serial port {}", device))?;

    port.write_all(&REQUEST_FRAME)
        .context("Failed to write request frame")?;

    let mut frame = vec![0u8; RESPONSE_LEN];
    let mut filled = 0;
    while filled < frame.len() {
        match port.read(&mut frame[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::TimedOut => break,
            Err(e) => return Err(e).context("Failed to read response frame"),
        }
    }
    frame.truncate(filled);

    debug!("Read {} byte(s) from {}", filled, device);
    Ok(frame)
}
