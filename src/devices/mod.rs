pub mod control;
pub mod gps;

pub use control::{CommandChannel, CommandSink, ControlCommand};
pub use gps::{GpsFix, GpsService};
