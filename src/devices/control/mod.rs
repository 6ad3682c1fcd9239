pub mod command;
pub mod command_channel;

pub use command::{ControlAction, ControlCommand, ControlDevice};
pub use command_channel::{CommandChannel, CommandSink, ControlPort};
