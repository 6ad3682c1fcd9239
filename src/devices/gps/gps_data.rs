use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single parsed latitude/longitude pair.
///
/// The JSON form is exactly `{"latitude": <number>, "longitude": <number>}`,
/// which is what `GET /api/gps` returns verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for GpsFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°, {:.6}°", self.latitude, self.longitude)
    }
}

/// Why a raw line was rejected. Rejections are logged and discarded; they
/// never cross a component boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixParseError {
    #[error("line does not match 'Latitude = <num> Longitude = <num>' ({0} tokens)")]
    Shape(usize),

    #[error("coordinate is not a finite number: {0}")]
    NonNumeric(String),
}

/// Parse one locator sentence of the form `Latitude = <num> Longitude = <num>`.
///
/// Tokens are separated by runs of whitespace; the keyword and `=` tokens are
/// matched literally. Both coordinates must parse as finite floats, so
/// scientific notation and negative values pass while `NaN`/`inf` do not.
pub fn parse_fix_line(line: &str) -> Result<GpsFix, FixParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() != 6
        || tokens[0] != "Latitude"
        || tokens[1] != "="
        || tokens[3] != "Longitude"
        || tokens[4] != "="
    {
        return Err(FixParseError::Shape(tokens.len()));
    }

    let latitude = parse_finite(tokens[2])?;
    let longitude = parse_finite(tokens[5])?;

    Ok(GpsFix { latitude, longitude })
}

fn parse_finite(token: &str) -> Result<f64, FixParseError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FixParseError::NonNumeric(token.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let fix = parse_fix_line("Latitude = 36.8 Longitude = 10.2").unwrap();
        assert_eq!(fix, GpsFix { latitude: 36.8, longitude: 10.2 });
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let fix = parse_fix_line("  Latitude   =  36.8\tLongitude = 10.2  ").unwrap();
        assert_eq!(fix.latitude, 36.8);
        assert_eq!(fix.longitude, 10.2);
    }

    #[test]
    fn test_parse_negative_and_scientific() {
        let fix = parse_fix_line("Latitude = -36.8 Longitude = 1.02e1").unwrap();
        assert_eq!(fix, GpsFix { latitude: -36.8, longitude: 10.2 });
    }

    #[test]
    fn test_parse_rejects_missing_spacing() {
        // "Longitude=10.2" collapses two tokens into one
        assert_eq!(
            parse_fix_line("Latitude = 36.8 Longitude=10.2"),
            Err(FixParseError::Shape(4))
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_fragment() {
        assert_eq!(parse_fix_line(""), Err(FixParseError::Shape(0)));
        assert_eq!(parse_fix_line("Latitude = 36.8 Longi"), Err(FixParseError::Shape(4)));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(
            parse_fix_line("Latitude = abc Longitude = 10.2"),
            Err(FixParseError::NonNumeric("abc".to_string()))
        );
        // NaN parses as a float but is not a usable coordinate
        assert_eq!(
            parse_fix_line("Latitude = NaN Longitude = 10.2"),
            Err(FixParseError::NonNumeric("NaN".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_wrong_keywords() {
        assert_eq!(
            parse_fix_line("latitude = 36.8 Longitude = 10.2"),
            Err(FixParseError::Shape(6))
        );
    }

    #[test]
    fn test_fix_serializes_to_plain_pair() {
        let fix = GpsFix { latitude: 36.8, longitude: 10.2 };
        let json = serde_json::to_value(&fix).unwrap();
        assert_eq!(json, serde_json::json!({"latitude": 36.8, "longitude": 10.2}));
    }
}
