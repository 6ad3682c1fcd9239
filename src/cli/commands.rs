use clap::{Arg, ArgMatches, Command};
use log::info;

use crate::config::Config;
use crate::devices::control::{CommandChannel, CommandSink};
use crate::services::api_service::{validate_control_request, ControlRequest};

pub fn build_cli() -> Command {
    Command::new("locator-bridge")
        .version(crate::VERSION)
        .about("Serial-to-HTTP bridge for a GPS object locator")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("gps-port")
                .long("gps-port")
                .value_name("PORT")
                .help("Serial port delivering locator sentences"),
        )
        .arg(
            Arg::new("gps-baud")
                .long("gps-baud")
                .value_name("BAUD")
                .help("Baud rate of the locator port"),
        )
        .arg(
            Arg::new("control-port")
                .long("control-port")
                .value_name("PORT")
                .help("Serial port accepting device-control commands"),
        )
        .arg(
            Arg::new("control-baud")
                .long("control-baud")
                .value_name("BAUD")
                .help("Baud rate of the control port"),
        )
        .arg(
            Arg::new("http-port")
                .long("http-port")
                .value_name("PORT")
                .help("HTTP listen port"),
        )
        .subcommand(Command::new("listports").about("List available serial ports"))
        .subcommand(
            Command::new("sendcmd")
                .about("Send a one-shot control command and exit")
                .arg(Arg::new("device").required(true).help("LED or Buzzer"))
                .arg(Arg::new("action").required(true).help("on or off")),
        )
        .subcommand(
            Command::new("genconfig")
                .about("Write the default configuration to a file")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .default_value("config.toml"),
                ),
        )
}

/// Run whichever subcommand was given. Returns `true` when one consumed the
/// invocation and the bridge should not start.
pub async fn handle_subcommands(
    matches: &ArgMatches,
    config: &Config,
) -> Result<bool, Box<dyn std::error::Error>> {
    if matches.subcommand_matches("listports").is_some() {
        list_serial_ports()?;
        return Ok(true);
    }

    if let Some(matches) = matches.subcommand_matches("sendcmd") {
        let request = ControlRequest {
            device: matches.get_one::<String>("device").cloned(),
            action: matches.get_one::<String>("action").cloned(),
        };
        let command = validate_control_request(&request)?;

        info!("📤 Sending one-shot command {}...", command);
        let channel = CommandChannel::new(
            &config.control.port,
            config.control.baud_rate,
            config.control.timeout_ms,
        );
        channel.send(&command).await?;
        println!("✅ Command {} sent on {}", command, config.control.port);
        return Ok(true);
    }

    if let Some(matches) = matches.subcommand_matches("genconfig") {
        let output = matches.get_one::<String>("output").unwrap();
        config.save_to_file(output)?;
        println!("✅ Configuration written to {}", output);
        return Ok(true);
    }

    Ok(false)
}

fn list_serial_ports() -> Result<(), Box<dyn std::error::Error>> {
    println!("📡 Available Serial Ports:");

    let ports = serialport::available_ports()?;
    if ports.is_empty() {
        println!("   ⚠️  No serial ports found");
        return Ok(());
    }

    for (index, port) in ports.iter().enumerate() {
        println!("   {}. {}", index + 1, port.port_name);
        if let serialport::SerialPortType::UsbPort(usb_info) = &port.port_type {
            if let Some(manufacturer) = &usb_info.manufacturer {
                println!("      📱 Manufacturer: {}", manufacturer);
            }
            if let Some(serial_number) = &usb_info.serial_number {
                println!("      🔢 Serial Number: {}", serial_number);
            }
        }
    }

    Ok(())
}
