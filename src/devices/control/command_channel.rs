use async_trait::async_trait;
use log::{error, info};
use serialport::SerialPort;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use super::command::ControlCommand;
use crate::utils::error::BridgeError;

/// Anything a control command can be written to. The production
/// implementation wraps the outbound serial port; tests substitute a
/// recording fake.
pub trait ControlPort: Send {
    fn write_line(&mut self, line: &str) -> Result<(), std::io::Error>;
}

struct SerialControlPort {
    port: Box<dyn SerialPort>,
}

impl ControlPort for SerialControlPort {
    fn write_line(&mut self, line: &str) -> Result<(), std::io::Error> {
        self.port.write_all(line.as_bytes())?;
        self.port.flush()
    }
}

/// The sink the HTTP façade and CLI deliver commands through.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn send(&self, command: &ControlCommand) -> Result<(), BridgeError>;
}

/// The command channel: owns the outbound serial connection, opened on
/// first use and left open thereafter.
///
/// `send` makes exactly one attempt per call: open-if-needed, then write.
/// An open failure leaves the port closed for the next caller; a write
/// failure keeps the port as-is. No retry either way.
pub struct CommandChannel {
    port_name: String,
    baud_rate: u32,
    timeout_ms: u64,
    port: Mutex<Option<Box<dyn ControlPort>>>,
}

impl CommandChannel {
    pub fn new(port_name: &str, baud_rate: u32, timeout_ms: u64) -> Self {
        Self {
            port_name: port_name.to_string(),
            baud_rate,
            timeout_ms,
            port: Mutex::new(None),
        }
    }

    /// Seed the channel with an already-open port.
    #[cfg(test)]
    pub(crate) fn with_open_port(port_name: &str, port: Box<dyn ControlPort>) -> Self {
        Self {
            port_name: port_name.to_string(),
            baud_rate: 9600,
            timeout_ms: 100,
            port: Mutex::new(Some(port)),
        }
    }

    fn open_port(&self) -> Result<Box<dyn ControlPort>, BridgeError> {
        info!("🔌 Opening control port {} at {} baud", self.port_name, self.baud_rate);

        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(Duration::from_millis(self.timeout_ms))
            .open()
            .map_err(|e| {
                BridgeError::OpenFailed(format!("control port {}: {}", self.port_name, e))
            })?;

        info!("✅ Control port opened");
        Ok(Box::new(SerialControlPort { port }))
    }
}

#[async_trait]
impl CommandSink for CommandChannel {
    async fn send(&self, command: &ControlCommand) -> Result<(), BridgeError> {
        let line = command.to_line();

        let mut guard = self.port.lock().map_err(|_| BridgeError::LockError)?;

        if guard.is_none() {
            // First use: open and keep the port for the channel's lifetime
            match self.open_port() {
                Ok(port) => *guard = Some(port),
                Err(e) => {
                    error!("❌ {}", e);
                    return Err(e);
                }
            }
        }

        if let Some(port) = guard.as_mut() {
            port.write_line(&line).map_err(|e| {
                error!("❌ Write of {} failed: {}", command, e);
                BridgeError::WriteFailed(format!("{}: {}", command, e))
            })?;
        }

        info!("📤 Sent control command {}", command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::control::command::{ControlAction, ControlDevice};
    use std::sync::Arc;

    /// Records written lines; shared with the test through an Arc.
    struct RecordingPort {
        written: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ControlPort for RecordingPort {
        fn write_line(&mut self, line: &str) -> Result<(), std::io::Error> {
            if self.fail {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "wire gone"));
            }
            self.written.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    fn led_on() -> ControlCommand {
        ControlCommand::new(ControlDevice::Led, ControlAction::On)
    }

    #[tokio::test]
    async fn test_send_writes_exactly_once_per_call() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = RecordingPort { written: written.clone(), fail: false };
        // The port name does not resolve to hardware, so any re-open
        // attempt would surface as an OpenFailed error below.
        let channel = CommandChannel::with_open_port("/nonexistent", Box::new(port));

        channel.send(&led_on()).await.unwrap();
        channel
            .send(&ControlCommand::new(ControlDevice::Buzzer, ControlAction::Off))
            .await
            .unwrap();

        assert_eq!(*written.lock().unwrap(), vec!["LED_ON\n", "Buzzer_OFF\n"]);
    }

    #[tokio::test]
    async fn test_open_failure_reports_and_leaves_port_closed() {
        let channel = CommandChannel::new("/nonexistent-port", 9600, 100);

        let err = channel.send(&led_on()).await.unwrap_err();
        assert!(matches!(err, BridgeError::OpenFailed(_)));

        // Still closed: the next call fails the same way instead of writing
        let err = channel.send(&led_on()).await.unwrap_err();
        assert!(matches!(err, BridgeError::OpenFailed(_)));
    }

    #[tokio::test]
    async fn test_write_failure_is_surfaced_without_retry() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = RecordingPort { written: written.clone(), fail: true };
        let channel = CommandChannel::with_open_port("/nonexistent", Box::new(port));

        let err = channel.send(&led_on()).await.unwrap_err();
        assert!(matches!(err, BridgeError::WriteFailed(_)));
        assert!(written.lock().unwrap().is_empty());
    }
}
