//! GPS Locator Bridge Library
//!
//! This library bridges a serial-attached GPS locator to a small JSON HTTP
//! API: one channel continuously ingests position sentences and keeps the
//! latest fix, the other writes device-control commands back out a second
//! serial port.

pub mod cli;
pub mod config;
pub mod devices;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use devices::control::{CommandChannel, CommandSink, ControlAction, ControlCommand, ControlDevice};
pub use devices::gps::{parse_fix_line, FixParseError, GpsFix, GpsReader, GpsService};
pub use services::ApiService;
pub use utils::error::BridgeError;

pub const VERSION: &str = "1.0.0";
