pub mod settings;

pub use settings::{Config, HttpConfig, SerialLinkConfig};
