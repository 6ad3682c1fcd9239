use log::{debug, info};
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;

use super::gps_data::{parse_fix_line, GpsFix};
use crate::utils::error::BridgeError;

/// Owns the inbound serial connection and the line framing on top of it.
///
/// The locator firmware prints one `Latitude = <num> Longitude = <num>`
/// sentence per line; fragments sit in the buffer until the delimiter
/// arrives.
pub struct GpsReader {
    port: Box<dyn SerialPort>,
    line_buffer: String,
}

impl GpsReader {
    pub fn new(port_name: &str, baud_rate: u32, timeout_ms: u64) -> Result<Self, BridgeError> {
        info!("🧭 Opening GPS port {} at {} baud", port_name, baud_rate);

        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(timeout_ms))
            .open()
            .map_err(|e| BridgeError::OpenFailed(format!("GPS port {}: {}", port_name, e)))?;

        Ok(Self {
            port,
            line_buffer: String::new(),
        })
    }

    /// Stream fixes to `on_fix` until it returns `false` or the port dies.
    ///
    /// Lines that do not parse are logged and dropped; a read error other
    /// than a timeout ends the stream (there is no reconnect).
    pub fn run<F>(&mut self, mut on_fix: F) -> Result<(), BridgeError>
    where
        F: FnMut(GpsFix) -> bool,
    {
        let mut buffer = [0u8; 1024];

        loop {
            match self.port.read(&mut buffer) {
                Ok(0) => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Ok(n) => {
                    let chunk = String::from_utf8_lossy(&buffer[..n]);
                    self.line_buffer.push_str(&chunk);

                    for line in drain_complete_lines(&mut self.line_buffer) {
                        if line.is_empty() {
                            continue;
                        }

                        debug!("📥 Received locator line: {}", line);

                        match parse_fix_line(&line) {
                            Ok(fix) => {
                                if !on_fix(fix) {
                                    return Ok(());
                                }
                            }
                            Err(e) => {
                                debug!("⚠️ Discarding line: {}", e);
                            }
                        }
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    continue;
                }
                Err(e) => {
                    return Err(BridgeError::CommunicationError(format!(
                        "GPS read failed: {}",
                        e
                    )));
                }
            }
        }
    }
}

/// Pull every complete line out of `buffer`, leaving any trailing fragment
/// in place. Lines come back trimmed with the CR of CRLF endings removed.
fn drain_complete_lines(buffer: &mut String) -> Vec<String> {
    let mut lines = Vec::new();

    while let Some(newline_pos) = buffer.find('\n') {
        let line = buffer[..newline_pos].trim_end_matches('\r').trim().to_string();
        buffer.drain(..=newline_pos);
        lines.push(line);
    }

    lines
}
