//! Compact duration parsing and hour/minute/second breakdowns

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:\.\d+)?S)?)?$")
            .expect("duration pattern is a valid regex")
    })
}

/// Parse a compact catalog duration such as `PT1H2M3S`, `PT45S` or `P1DT2H`
/// into whole seconds.
///
/// Any component may be omitted when zero. Returns `None` when the value is
/// not a duration encoding at all, or does not fit in `u64` seconds.
pub fn parse_compact_duration(value: &str) -> Option<u64> {
    let captures = duration_pattern().captures(value.trim())?;

    // Absent components are zero; an out-of-range one makes the value unusable
    let component = |index: usize, scale: u64| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse::<u64>().ok()?.checked_mul(scale),
            None => Some(0),
        }
    };

    [(1, 86_400), (2, 3600), (3, 60), (4, 1)]
        .into_iter()
        .try_fold(0u64, |total, (index, scale)| total.checked_add(component(index, scale)?))
}

/// Hours/minutes/seconds breakdown of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Break a (possibly fractional) number of seconds into fields, flooring
    /// each field independently.
    pub fn from_seconds(total: f64) -> Self {
        let total = if total.is_finite() && total > 0.0 { total } else { 0.0 };

        Self {
            hours: (total / SECONDS_PER_HOUR).floor() as u64,
            minutes: ((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE).floor() as u64,
            seconds: (total % SECONDS_PER_MINUTE).floor() as u64,
        }
    }

    pub fn from_whole_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Rough day count for long durations, `None` under a day
    pub fn approx_days(&self) -> Option<u64> {
        if self.hours < 24 {
            return None;
        }
        let hours = self.hours as f64
            + self.minutes as f64 / 60.0
            + self.seconds as f64 / SECONDS_PER_HOUR;
        Some((hours / 24.0).round() as u64)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours == 0 {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        } else {
            write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)?;
            if let Some(days) = self.approx_days() {
                write!(f, " (~{} days)", days)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_duration() {
        assert_eq!(parse_compact_duration("PT1H2M3S"), Some(3723));
    }

    #[test]
    fn test_parse_partial_durations() {
        assert_eq!(parse_compact_duration("PT45S"), Some(45));
        assert_eq!(parse_compact_duration("PT10M"), Some(600));
        assert_eq!(parse_compact_duration("PT2H"), Some(7200));
        assert_eq!(parse_compact_duration("PT1H5S"), Some(3605));
    }

    #[test]
    fn test_parse_day_component() {
        assert_eq!(parse_compact_duration("P1DT2H3M4S"), Some(86_400 + 7384));
        assert_eq!(parse_compact_duration("P0D"), Some(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_compact_duration(""), None);
        assert_eq!(parse_compact_duration("1:02:03"), None);
        assert_eq!(parse_compact_duration("PTXS"), None);
    }

    #[test]
    fn test_parse_out_of_range_is_none() {
        assert_eq!(parse_compact_duration("PT99999999999999999999S"), None);
        assert_eq!(parse_compact_duration("P999999999999999999D"), None);
        assert_eq!(parse_compact_duration("PT5124095576030431H"), None);
        assert_eq!(parse_compact_duration("P1DT1S"), Some(86_401));
    }

    #[test]
    fn test_hms_floors_each_field() {
        // 3723 / 1.5 = 2482.0
        assert_eq!(
            Hms::from_seconds(3723.0 / 1.5),
            Hms { hours: 0, minutes: 41, seconds: 22 }
        );
        assert_eq!(
            Hms::from_seconds(3599.9),
            Hms { hours: 0, minutes: 59, seconds: 59 }
        );
    }

    #[test]
    fn test_hms_round_trip() {
        for total in [0u64, 1, 59, 60, 61, 3599, 3600, 3661, 86_399, 90_061, 1_000_003] {
            assert_eq!(Hms::from_whole_seconds(total).total_seconds(), total);
            assert_eq!(Hms::from_seconds(total as f64).total_seconds(), total);
        }
    }

    #[test]
    fn test_hms_negative_is_zero() {
        assert_eq!(Hms::from_seconds(-5.0), Hms::default());
        assert_eq!(Hms::from_seconds(f64::NAN), Hms::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(Hms::from_whole_seconds(125).to_string(), "2m 5s");
        assert_eq!(Hms::from_whole_seconds(3725).to_string(), "1h 2m 5s");
        assert_eq!(
            Hms::from_whole_seconds(50 * 3600).to_string(),
            "50h 0m 0s (~2 days)"
        );
    }

    #[test]
    fn test_approx_days() {
        assert_eq!(Hms::from_whole_seconds(23 * 3600).approx_days(), None);
        assert_eq!(Hms::from_whole_seconds(36 * 3600).approx_days(), Some(2));
        assert_eq!(Hms::from_whole_seconds(30 * 3600).approx_days(), Some(1));
    }
}
