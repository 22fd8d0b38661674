//! SCORM data types and value validation.

use crate::error::{ErrorKind, Fault};
use serde::{Deserialize, Serialize};

/// Declared data type of a data model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataType {
    /// Free text with a maximum length in characters
    CmiString { max_len: usize },
    /// Identifier without whitespace, at most 255 characters
    Identifier,
    /// Real number, optionally bounded
    Decimal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Like `Decimal`, but the empty string is also accepted
    DecimalOrBlank {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Signed integer, optionally bounded
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// One of a fixed set of tokens
    Vocabulary { values: Vec<String> },
    /// Elapsed time, `HHHH:MM:SS.SS`
    Timespan,
    /// Time of day, `HH:MM:SS.SS`
    Time,
    /// Anything goes
    Any,
}

impl DataType {
    pub fn string(max_len: usize) -> Self {
        DataType::CmiString { max_len }
    }

    pub fn decimal(min: f64, max: f64) -> Self {
        DataType::Decimal {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn decimal_or_blank(min: f64, max: f64) -> Self {
        DataType::DecimalOrBlank {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn integer(min: i64, max: i64) -> Self {
        DataType::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn vocabulary(values: &[&str]) -> Self {
        DataType::Vocabulary {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Check a value against this type.
    ///
    /// Unparseable values are a [`ErrorKind::TypeMismatch`]; parseable values
    /// outside the declared bounds are a [`ErrorKind::RangeOutOfBounds`].
    pub fn validate(&self, value: &str) -> Result<(), Fault> {
        match self {
            DataType::CmiString { max_len } => {
                let len = value.chars().count();
                if len > *max_len {
                    return Err(mismatch(format!(
                        "string of {} characters exceeds maximum of {}",
                        len, max_len
                    )));
                }
                Ok(())
            }
            DataType::Identifier => {
                if value.chars().count() > 255 || value.chars().any(char::is_whitespace) {
                    return Err(mismatch(format!("'{}' is not a valid identifier", value)));
                }
                Ok(())
            }
            DataType::DecimalOrBlank { .. } if value.is_empty() => Ok(()),
            DataType::Decimal { min, max } | DataType::DecimalOrBlank { min, max } => {
                let parsed = parse_decimal(value)
                    .ok_or_else(|| mismatch(format!("'{}' is not a decimal", value)))?;
                check_bounds(parsed, *min, *max, value)
            }
            DataType::Integer { min, max } => {
                let parsed = value
                    .parse::<i64>()
                    .map_err(|_| mismatch(format!("'{}' is not an integer", value)))?;
                check_bounds(
                    parsed as f64,
                    min.map(|m| m as f64),
                    max.map(|m| m as f64),
                    value,
                )
            }
            DataType::Vocabulary { values } => {
                if values.iter().any(|v| v == value) {
                    Ok(())
                } else {
                    Err(mismatch(format!(
                        "'{}' is not one of [{}]",
                        value,
                        values.join(", ")
                    )))
                }
            }
            DataType::Timespan => parse_timespan(value)
                .map(|_| ())
                .ok_or_else(|| mismatch(format!("'{}' is not a timespan", value))),
            DataType::Time => parse_time(value)
                .map(|_| ())
                .ok_or_else(|| mismatch(format!("'{}' is not a time of day", value))),
            DataType::Any => Ok(()),
        }
    }
}

fn mismatch(diagnostic: String) -> Fault {
    Fault::new(ErrorKind::TypeMismatch, diagnostic)
}

fn check_bounds(parsed: f64, min: Option<f64>, max: Option<f64>, raw: &str) -> Result<(), Fault> {
    let below = min.is_some_and(|m| parsed < m);
    let above = max.is_some_and(|m| parsed > m);
    if below || above {
        return Err(Fault::new(
            ErrorKind::RangeOutOfBounds,
            format!(
                "{} is outside [{}, {}]",
                raw,
                min.map_or("-inf".to_string(), |m| m.to_string()),
                max.map_or("inf".to_string(), |m| m.to_string())
            ),
        ));
    }
    Ok(())
}

/// Parse a plain decimal number (`-12.5`, `80`), rejecting exponents,
/// `NaN` and infinities that `f64::from_str` would accept.
fn parse_decimal(value: &str) -> Option<f64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || digits.starts_with('.') && digits.len() == 1 {
        return None;
    }
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    value.parse::<f64>().ok()
}

fn parse_seconds(value: &str) -> Option<u64> {
    let (whole, frac) = match value.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (value, None),
    };
    if whole.len() != 2 || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let seconds: u64 = whole.parse().ok()?;
    if seconds > 59 {
        return None;
    }
    let centis = match frac {
        None => 0,
        Some(f) if (1..=2).contains(&f.len()) && f.chars().all(|c| c.is_ascii_digit()) => {
            let n: u64 = f.parse().ok()?;
            if f.len() == 1 {
                n * 10
            } else {
                n
            }
        }
        Some(_) => return None,
    };
    Some(seconds * 100 + centis)
}

fn parse_clock(value: &str, hour_digits: std::ops::RangeInclusive<usize>) -> Option<(u64, u64)> {
    let mut parts = value.splitn(3, ':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    let seconds = parts.next()?;

    if !hour_digits.contains(&hours.len()) || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if minutes.len() != 2 || !minutes.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let h: u64 = hours.parse().ok()?;
    let m: u64 = minutes.parse().ok()?;
    if m > 59 {
        return None;
    }
    let centis = parse_seconds(seconds)?;
    Some((h, m * 60 * 100 + centis))
}

/// Parse `HHHH:MM:SS.SS` (2 to 4 hour digits) into centiseconds
pub fn parse_timespan(value: &str) -> Option<u64> {
    let (hours, rest) = parse_clock(value, 2..=4)?;
    Some(hours * 3600 * 100 + rest)
}

/// Parse `HH:MM:SS.SS` into centiseconds since midnight
pub fn parse_time(value: &str) -> Option<u64> {
    let (hours, rest) = parse_clock(value, 2..=2)?;
    if hours > 23 {
        return None;
    }
    Some(hours * 3600 * 100 + rest)
}

/// Format centiseconds as `HHHH:MM:SS` or `HHHH:MM:SS.SS`.
///
/// Spans beyond 9999 hours saturate at the largest representable value.
pub fn format_timespan(centis: u64) -> String {
    let max = (9999 * 3600 + 59 * 60 + 59) * 100 + 99;
    let centis = centis.min(max);
    let hours = centis / 360_000;
    let minutes = (centis / 6_000) % 60;
    let seconds = (centis / 100) % 60;
    let frac = centis % 100;
    if frac == 0 {
        format!("{:04}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:04}:{:02}:{:02}.{:02}", hours, minutes, seconds, frac)
    }
}

/// Sum two timespans; `None` if either fails to parse
pub fn add_timespans(a: &str, b: &str) -> Option<String> {
    Some(format_timespan(parse_timespan(a)? + parse_timespan(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_range() {
        let score = DataType::decimal(0.0, 100.0);
        assert!(score.validate("0").is_ok());
        assert!(score.validate("99.5").is_ok());
        assert!(score.validate("100").is_ok());

        let err = score.validate("150").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RangeOutOfBounds);
        let err = score.validate("-1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RangeOutOfBounds);

        for bad in ["abc", "", "1e3", "NaN", "inf", "1.2.3", "-", "."] {
            assert_eq!(
                score.validate(bad).unwrap_err().kind,
                ErrorKind::TypeMismatch,
                "{bad}"
            );
        }
    }

    #[test]
    fn test_decimal_or_blank() {
        let score = DataType::decimal_or_blank(0.0, 100.0);
        assert!(score.validate("").is_ok());
        assert!(score.validate("42").is_ok());
        assert_eq!(
            score.validate("101").unwrap_err().kind,
            ErrorKind::RangeOutOfBounds
        );
        assert_eq!(score.validate(" ").unwrap_err().kind, ErrorKind::TypeMismatch);

        let parsed: DataType =
            serde_json::from_str(r#"{"type": "decimal_or_blank", "min": 0.0}"#).unwrap();
        assert_eq!(
            parsed,
            DataType::DecimalOrBlank {
                min: Some(0.0),
                max: None
            }
        );
    }

    #[test]
    fn test_integer_range() {
        let audio = DataType::integer(-1, 100);
        assert!(audio.validate("-1").is_ok());
        assert_eq!(
            audio.validate("101").unwrap_err().kind,
            ErrorKind::RangeOutOfBounds
        );
        assert_eq!(
            audio.validate("1.5").unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_vocabulary_and_strings() {
        let exit = DataType::vocabulary(&["time-out", "suspend", "logout", ""]);
        assert!(exit.validate("suspend").is_ok());
        assert!(exit.validate("").is_ok());
        assert!(exit.validate("Suspend").is_err());

        let short = DataType::string(4);
        assert!(short.validate("abcd").is_ok());
        assert_eq!(
            short.validate("abcde").unwrap_err().kind,
            ErrorKind::TypeMismatch
        );

        assert!(DataType::Identifier.validate("obj_1").is_ok());
        assert!(DataType::Identifier.validate("obj 1").is_err());
    }

    #[test]
    fn test_timespan_parsing() {
        assert_eq!(parse_timespan("00:00:01"), Some(100));
        assert_eq!(parse_timespan("0001:30:00.5"), Some((3600 + 1800) * 100 + 50));
        assert_eq!(parse_timespan("1:00:00"), None);
        assert_eq!(parse_timespan("00:60:00"), None);
        assert_eq!(parse_timespan("00:00:00.123"), None);
        assert!(DataType::Timespan.validate("0000:05:30.25").is_ok());

        assert_eq!(parse_time("23:59:59"), Some((23 * 3600 + 59 * 60 + 59) * 100));
        assert_eq!(parse_time("24:00:00"), None);
    }

    #[test]
    fn test_timespan_arithmetic() {
        assert_eq!(format_timespan(0), "0000:00:00");
        assert_eq!(
            add_timespans("0000:00:00", "00:10:30.50").as_deref(),
            Some("0000:10:30.50")
        );
        assert_eq!(
            add_timespans("0001:59:59.75", "00:00:00.25").as_deref(),
            Some("0002:00:00")
        );
        assert_eq!(add_timespans("bogus", "00:00:01"), None);
        assert_eq!(format_timespan(u64::MAX), "9999:59:59.99");
    }
}
