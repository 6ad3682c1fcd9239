pub mod gps_data;
pub mod gps_reader;
pub mod gps_service;

pub use gps_data::{parse_fix_line, FixParseError, GpsFix};
pub use gps_reader::GpsReader;
pub use gps_service::GpsService;
