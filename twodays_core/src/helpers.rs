//! Derived values the presentation layer shows next to the state.
//!
//! Everything here is a pure function of its arguments; none of it is
//! stored in the snapshot.

use crate::AppState;
use chrono::{DateTime, Duration, Utc};

/// Countdown to `end` formatted as `"{days}d {hours}h {minutes}m"`, or `"Expired"`
pub fn time_remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = end - now;
    if diff <= Duration::zero() {
        return "Expired".into();
    }

    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;
    format!("{}d {}h {}m", days, hours, minutes)
}

/// Shorter countdown used for quests: `"{hours}h {minutes}m"`, or `"Expired"`
pub fn quest_time_left(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = expires_at - now;
    if diff <= Duration::zero() {
        return "Expired".into();
    }

    format!("{}h {}m", diff.num_hours(), diff.num_minutes() % 60)
}

/// `current / target * 100`, not clamped. A zero target yields 0.
pub fn progress_percentage(current: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    f64::from(current) / f64::from(target) * 100.0
}

/// Whole days since registration, rounded up
pub fn days_active(registration_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - registration_date).num_milliseconds().abs();
    let day = Duration::days(1).num_milliseconds();
    (millis + day - 1) / day
}

/// Human-readable duration: "10 minutes", "1 hour", "2 hours 5 minutes"
pub fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{} minutes", minutes);
    }

    let hours = minutes / 60;
    let remaining = minutes % 60;
    let hours_part = format!("{} hour{}", hours, if hours > 1 { "s" } else { "" });

    if remaining == 0 {
        hours_part
    } else {
        format!(
            "{} {} minute{}",
            hours_part,
            remaining,
            if remaining > 1 { "s" } else { "" }
        )
    }
}

/// Totals shown on the statistics screens
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionSummary {
    pub completed_tasks: usize,
    pub received_badges: usize,
    pub total_minutes: u64,
    pub average_minutes: u64,
    pub unlocked_achievements: usize,
    pub total_achievements: usize,
    /// Rounded percentage of achievements unlocked
    pub achievement_percentage: u32,
}

pub fn completion_summary(state: &AppState) -> CompletionSummary {
    let completed_tasks = state.completed_tasks.len();
    let total_minutes: u64 = state
        .completed_tasks
        .iter()
        .map(|t| u64::from(t.actual_duration_minutes.unwrap_or(t.duration_minutes)))
        .sum();
    let average_minutes = if completed_tasks > 0 {
        (total_minutes as f64 / completed_tasks as f64).round() as u64
    } else {
        0
    };

    let total_achievements = state.achievements.len();
    let unlocked_achievements = state.achievements.iter().filter(|a| a.is_unlocked).count();
    let achievement_percentage = if total_achievements > 0 {
        (unlocked_achievements as f64 / total_achievements as f64 * 100.0).round() as u32
    } else {
        0
    };

    CompletionSummary {
        completed_tasks,
        received_badges: state.received_badges(),
        total_minutes,
        average_minutes,
        unlocked_achievements,
        total_achievements,
        achievement_percentage,
    }
}
