//! Motivational quotes shown on the home screen.

use chrono::{DateTime, Datelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MOTIVATION_QUOTES: &[&str] = &[
    "YOUR 2 DAYS ARE YOUR CHALLENGE",
    "Small steps lead to big changes",
    "Every expert was once a beginner",
    "Progress, not perfection",
    "You are stronger than you think",
    "Consistency is the key to success",
    "Today is a new opportunity",
    "Believe in yourself",
    "Every challenge makes you stronger",
    "Success starts with a single step",
    "Your future self will thank you",
    "Make today count",
    "Small actions, big results",
    "You have the power to change",
    "Every day is a fresh start",
];

/// Quote of the day; stable for a whole calendar day
pub fn daily_motivation(date: DateTime<Utc>) -> &'static str {
    let index = date.ordinal() as usize % MOTIVATION_QUOTES.len();
    MOTIVATION_QUOTES[index]
}

pub fn random_motivation<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MOTIVATION_QUOTES
        .choose(rng)
        .copied()
        .unwrap_or(MOTIVATION_QUOTES[0])
}
