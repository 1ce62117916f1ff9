//! Time-string parsing and formatting used for trim arithmetic

use thiserror::Error;

/// Malformed `HH:MM:SS[.mmm]` time string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time format: {time}. Expected HH:MM:SS[.mmm] ({reason})")]
pub struct TimeFormatError {
    pub time: String,
    pub reason: &'static str,
}

/// Converts between `HH:MM:SS[.mmm]` strings and millisecond durations
pub struct TimeCodec;

impl TimeCodec {
    /// Parse a time string into milliseconds.
    ///
    /// Parsing is strict: hours are one or more digits, minutes and seconds
    /// exactly two digits below 60, and the optional fraction one to three
    /// digits.
    pub fn to_milliseconds(time_str: &str) -> Result<u64, TimeFormatError> {
        let fail = |reason| TimeFormatError {
            time: time_str.to_string(),
            reason,
        };

        let parts: Vec<&str> = time_str.split(':').collect();
        if parts.len() != 3 {
            return Err(fail("expected three ':' separated segments"));
        }

        let hours = parse_digits(parts[0]).ok_or_else(|| fail("invalid hours"))?;

        if parts[1].len() != 2 {
            return Err(fail("minutes must have two digits"));
        }
        let minutes = parse_digits(parts[1]).ok_or_else(|| fail("invalid minutes"))?;
        if minutes >= 60 {
            return Err(fail("minutes must be less than 60"));
        }

        let (secs_part, frac_part) = match parts[2].split_once('.') {
            Some((secs, frac)) => (secs, Some(frac)),
            None => (parts[2], None),
        };
        if secs_part.len() != 2 {
            return Err(fail("seconds must have two digits"));
        }
        let seconds = parse_digits(secs_part).ok_or_else(|| fail("invalid seconds"))?;
        if seconds >= 60 {
            return Err(fail("seconds must be less than 60"));
        }

        let millis = match frac_part {
            None => 0,
            Some(frac) if (1..=3).contains(&frac.len()) => {
                let value = parse_digits(frac).ok_or_else(|| fail("invalid milliseconds"))?;
                // ".5" is 500 ms, ".05" is 50 ms
                value * 10u64.pow(3 - frac.len() as u32)
            }
            Some(_) => return Err(fail("milliseconds must have one to three digits")),
        };

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| fail("hours out of range"))
    }

    /// Format milliseconds as canonical `HH:MM:SS.mmm`
    pub fn to_time_string(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }
}

fn parse_digits(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
