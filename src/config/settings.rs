use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Bridge identification
    pub bridge_name: String,

    // Inbound locator link (GPS sentences)
    pub gps: SerialLinkConfig,

    // Outbound control link (LED/buzzer commands)
    pub control: SerialLinkConfig,

    // HTTP surface
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialLinkConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

impl Default for SerialLinkConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    // When false, a failed outbound write is only logged and the control
    // endpoint still acknowledges. When true, the failure surfaces as a 502.
    pub surface_send_errors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            surface_send_errors: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bridge_name: "Object Locator Bridge".to_string(),
            gps: SerialLinkConfig {
                port: "/dev/ttyUSB0".to_string(),
                baud_rate: 9600,
                timeout_ms: 100,
            },
            control: SerialLinkConfig {
                port: "/dev/ttyACM0".to_string(),
                baud_rate: 9600,
                timeout_ms: 1000,
            },
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the effective configuration: the file named by `--config` if
    /// given (defaults otherwise), then command line overrides on top.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = matches.get_one::<String>("gps-port") {
            config.gps.port = port.clone();
        }
        if let Some(baud) = matches.get_one::<String>("gps-baud") {
            config.gps.baud_rate = baud.parse()?;
        }
        if let Some(port) = matches.get_one::<String>("control-port") {
            config.control.port = port.clone();
        }
        if let Some(baud) = matches.get_one::<String>("control-baud") {
            config.control.baud_rate = baud.parse()?;
        }
        if let Some(port) = matches.get_one::<String>("http-port") {
            config.http.port = port.parse()?;
        }

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports_and_rates() {
        let config = Config::default();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.gps.baud_rate, 9600);
        assert!(!config.http.surface_send_errors);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [gps]
            port = "/dev/ttyAMA0"

            [http]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.gps.port, "/dev/ttyAMA0");
        assert_eq!(config.gps.baud_rate, 9600);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.control.port, "/dev/ttyACM0");
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.http.surface_send_errors = true;
        config.control.port = "/dev/ttyUSB1".to_string();

        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();

        assert_eq!(reparsed.control.port, "/dev/ttyUSB1");
        assert!(reparsed.http.surface_send_errors);
    }
}
