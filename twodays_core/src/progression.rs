//! Progression logic for experience, levels, streaks and ranks.
//!
//! This module implements the numeric rules the reducer applies to the user:
//! - Experience: gains accumulate, crossing the threshold levels the user up
//!   and grows the next threshold by the level multiplier
//! - Points: half of every experience gain, rounded down
//! - Streaks: the longest streak tracks the maximum ever observed
//! - Ranks: tier derived from accumulated points

use crate::{Config, Rank, RankConfig, User};

/// Smallest level multiplier the rules accept. Keeps threshold growth geometric.
pub const MIN_LEVEL_MULTIPLIER: f64 = 1.01;

/// Parameters the reducer needs from configuration
#[derive(Clone, Debug)]
pub struct ProgressionRules {
    pub level_multiplier: f64,
    pub base_task_experience: u64,
    pub minutes_per_bonus_experience: u32,
    pub ranks: RankConfig,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ProgressionRules {
    fn from(config: &Config) -> Self {
        Self {
            level_multiplier: config.progression.level_multiplier,
            base_task_experience: config.progression.base_task_experience,
            minutes_per_bonus_experience: config.progression.minutes_per_bonus_experience,
            ranks: config.ranks.clone(),
        }
    }
}

impl ProgressionRules {
    /// Experience awarded for completing a task of the given planned duration
    pub fn task_experience(&self, duration_minutes: u32) -> u64 {
        let per = self.minutes_per_bonus_experience.max(1);
        self.base_task_experience
            .saturating_add(u64::from(duration_minutes / per))
    }

    /// Next threshold after a level-up: `floor(threshold * multiplier)`
    ///
    /// Always strictly greater than `threshold` (until it saturates at `u64::MAX`),
    /// so small thresholds like 4 still grow under a 1.2 multiplier.
    pub fn next_threshold(&self, threshold: u64) -> u64 {
        let multiplier = self.level_multiplier.max(MIN_LEVEL_MULTIPLIER);
        // Epsilon absorbs binary rounding of multipliers like 1.2
        let scaled = (threshold as f64 * multiplier + 1e-9).floor() as u64;
        scaled.max(threshold.saturating_add(1))
    }

    pub fn rank_for_points(&self, points: u64) -> Rank {
        let r = &self.ranks;
        if points >= r.diamond {
            Rank::Diamond
        } else if points >= r.platinum {
            Rank::Platinum
        } else if points >= r.gold {
            Rank::Gold
        } else if points >= r.silver {
            Rank::Silver
        } else {
            Rank::Bronze
        }
    }
}

/// Apply an experience gain to a user, returning the number of levels gained
///
/// Level-ups cascade: a single large gain keeps levelling until the
/// remaining experience is below the current threshold. Counters saturate
/// instead of wrapping, so totals and points never decrease.
pub fn apply_experience(user: &mut User, amount: u64, rules: &ProgressionRules) -> u32 {
    let mut experience = user.experience.saturating_add(amount);
    let mut threshold = user.experience_to_next_level.max(1);
    let mut levels_gained: u32 = 0;

    while experience >= threshold {
        experience -= threshold;
        threshold = rules.next_threshold(threshold);
        levels_gained = levels_gained.saturating_add(1);
    }

    let previous_level = user.level;
    user.experience = experience;
    user.experience_to_next_level = threshold;
    user.level = user.level.saturating_add(levels_gained);
    user.total_experience = user.total_experience.saturating_add(amount);
    user.points = user.points.saturating_add(amount / 2);
    user.rank = rules.rank_for_points(user.points);

    if levels_gained > 0 {
        tracing::info!(
            "Level up: {} -> {} ({} / {} xp)",
            previous_level,
            user.level,
            user.experience,
            user.experience_to_next_level
        );
    } else {
        tracing::debug!(
            "Gained {} xp: {} / {}",
            amount,
            user.experience,
            user.experience_to_next_level
        );
    }

    levels_gained
}

/// Set the current streak and keep the longest streak at the maximum observed
pub fn apply_streak(user: &mut User, streak: u32) {
    user.streak = streak;
    user.longest_streak = user.longest_streak.max(streak);
    tracing::debug!(
        "Streak updated: {} (longest {})",
        user.streak,
        user.longest_streak
    );
}
