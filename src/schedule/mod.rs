/// Study scheduling module
///
/// Spreads the watch time of an aggregate evenly over the calendar days before
/// a deadline. The deadline's own day is kept free for revision.

pub mod format;

pub use format::{format_hours_compact, format_hours_words, hours_to_seconds, parse_instant, parse_speed};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Label style for breakdown days, e.g. `Mon, Jan 1`
const DAY_LABEL_FORMAT: &str = "%a, %b %-d";

/// One day of a study plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAllocation {
    pub date: NaiveDate,
    /// New material for the day, in hours
    pub hours: f64,
    /// Final day, no new material
    pub revision_only: bool,
    /// Display line such as `Mon, Jan 1: 1h 0m 0s/day`
    pub summary: String,
}

/// Even day-by-day distribution of the needed watch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Full days strictly before the deadline's calendar day, always >= 1
    pub study_days: usize,
    pub needed_hours: f64,
    pub hours_per_day: f64,
    pub needed_seconds: u64,
    pub seconds_per_day: u64,
    /// Needed time in words
    pub needed: String,
    /// Per-day time, compact
    pub per_day: String,
    /// One entry per study day, then the revision day
    pub daily_breakdown: Vec<DayAllocation>,
}

impl StudyPlan {
    pub fn revision_day(&self) -> Option<&DayAllocation> {
        self.daily_breakdown.last().filter(|day| day.revision_only)
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format(DAY_LABEL_FORMAT).to_string()
}

/// Calendar days from `start`'s day up to, not including, `deadline`'s day
fn study_days(start: NaiveDateTime, deadline: NaiveDateTime) -> Vec<NaiveDate> {
    let last = deadline.date();
    let mut days = Vec::new();
    let mut current = start.date();

    while current < last {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

/// Build a study plan, or `None` when no plan is achievable: the deadline is
/// not after the start, no whole day remains before the deadline's day, or
/// the inputs are not usable numbers.
pub fn plan(
    total_hours: f64,
    speed_factor: f64,
    start: NaiveDateTime,
    deadline: NaiveDateTime,
) -> Option<StudyPlan> {
    if deadline <= start {
        debug!("No plan: deadline {} is not after start {}", deadline, start);
        return None;
    }
    if !(speed_factor.is_finite() && speed_factor > 0.0) || !(total_hours.is_finite() && total_hours >= 0.0) {
        debug!("No plan: unusable hours {} or speed {}", total_hours, speed_factor);
        return None;
    }

    let needed_hours = total_hours / speed_factor;

    let days = study_days(start, deadline);
    if days.is_empty() {
        debug!("No plan: no study day before {}", deadline.date());
        return None;
    }

    let hours_per_day = needed_hours / days.len() as f64;
    let per_day = format_hours_compact(hours_per_day);

    let mut daily_breakdown: Vec<DayAllocation> = days
        .iter()
        .map(|&date| DayAllocation {
            date,
            hours: hours_per_day,
            revision_only: false,
            summary: format!("{}: {}/day", day_label(date), per_day),
        })
        .collect();

    let deadline_day = deadline.date();
    daily_breakdown.push(DayAllocation {
        date: deadline_day,
        hours: 0.0,
        revision_only: true,
        summary: format!("{}: Revision Only", day_label(deadline_day)),
    });

    Some(StudyPlan {
        study_days: days.len(),
        needed_hours,
        hours_per_day,
        needed_seconds: hours_to_seconds(needed_hours),
        seconds_per_day: hours_to_seconds(hours_per_day),
        needed: format_hours_words(needed_hours),
        per_day,
        daily_breakdown,
    })
}
