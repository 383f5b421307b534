//! Decimal-hour formatting and study input parsing

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{AnalyzerError, Result};

/// Round decimal hours to whole seconds, once
pub fn hours_to_seconds(hours: f64) -> u64 {
    if hours.is_finite() && hours > 0.0 {
        (hours * 3600.0).round() as u64
    } else {
        0
    }
}

struct Parts {
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
}

fn split(total_seconds: u64) -> Parts {
    let hours = total_seconds / 3600;
    let (days, hours) = if hours >= 24 { (hours / 24, hours % 24) } else { (0, hours) };
    Parts {
        days,
        hours,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
    }
}

/// Compact form such as `2d 1h 0m 5s`, `1h 30m 0s` or `45s`.
///
/// Leading zero units are dropped; seconds always print.
pub fn format_hours_compact(hours: f64) -> String {
    let parts = split(hours_to_seconds(hours));
    let units = [
        (parts.days, "d"),
        (parts.hours, "h"),
        (parts.minutes, "m"),
    ];

    let mut out: Vec<String> = units
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();
    out.push(format!("{}s", parts.seconds));
    out.join(" ")
}

/// Long form such as `5 hours 0 minutes 0 seconds`, or `15 minutes, 0 seconds`
/// under an hour
pub fn format_hours_words(hours: f64) -> String {
    let parts = split(hours_to_seconds(hours));
    if parts.days > 0 {
        format!(
            "{} days {} hours {} minutes {} seconds",
            parts.days, parts.hours, parts.minutes, parts.seconds
        )
    } else if parts.hours == 0 {
        format!("{} minutes, {} seconds", parts.minutes, parts.seconds)
    } else {
        format!("{} hours {} minutes {} seconds", parts.hours, parts.minutes, parts.seconds)
    }
}

/// Parse a playback speed label like `1.5x`, `2X` or `1.25`
pub fn parse_speed(label: &str) -> Result<f64> {
    let trimmed = label.trim();
    let number = trimmed
        .strip_suffix('x')
        .or_else(|| trimmed.strip_suffix('X'))
        .unwrap_or(trimmed);

    match number.trim().parse::<f64>() {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Ok(speed),
        _ => Err(AnalyzerError::invalid_input(format!("Invalid playback speed: {}", label))),
    }
}

/// Parse a local date-time as entered in a form field.
///
/// Accepts `YYYY-MM-DDTHH:MM`, with optional seconds, a space instead of `T`,
/// or a bare date meaning midnight.
pub fn parse_instant(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| AnalyzerError::invalid_input(format!("Invalid date/time: {}", value)))
}
