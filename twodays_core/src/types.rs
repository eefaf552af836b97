//! Core domain types for the TwoDays progression system.
//!
//! This module defines the fundamental types used throughout the system:
//! - The user profile and its progression counters
//! - Tasks (challenges or lessons) and their lifecycle
//! - Gamification entities (badges, quests, achievements, leaderboard)
//! - Notifications and vocabulary words
//! - The application state snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// User Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Man,
    Woman,
}

/// Tier label derived from accumulated points
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

/// The singleton user profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub sex: Sex,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub time_in_app_hours: f64,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub level: u32,
    pub experience: u64,
    pub experience_to_next_level: u64,
    pub total_experience: u64,
    pub streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub rank: Rank,
    pub points: u64,
    #[serde(default)]
    pub words_learned: u32,
}

impl User {
    /// A fresh level-1 profile registered at `now`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sex: Sex,
        now: DateTime<Utc>,
        experience_to_next_level: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sex,
            registration_date: now,
            time_in_app_hours: 0.0,
            profile_picture: None,
            level: 1,
            experience: 0,
            experience_to_next_level,
            total_experience: 0,
            streak: 0,
            longest_streak: 0,
            rank: Rank::Bronze,
            points: 0,
            words_learned: 0,
        }
    }
}

// ============================================================================
// Task Types
// ============================================================================

/// Lifecycle position of a task, derived from its flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Accepted,
    Completed,
}

/// A single unit of work: a sport challenge or a language lesson
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    #[serde(default, alias = "is_started")]
    pub is_accepted: bool,
    #[serde(default)]
    pub is_completed: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_duration_minutes: Option<u32>,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        if self.is_completed {
            TaskStatus::Completed
        } else if self.is_accepted {
            TaskStatus::Accepted
        } else {
            TaskStatus::Pending
        }
    }

    /// Whether the acceptance window has closed. Display only; never drives a transition.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    /// Copy of this task marked as accepted at `now`
    pub fn accepted(&self, now: DateTime<Utc>) -> Self {
        Self {
            is_accepted: true,
            accepted_at: Some(now),
            ..self.clone()
        }
    }
}

// ============================================================================
// Gamification Types
// ============================================================================

/// A named award, pre-seeded and received at most once
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub is_received: bool,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Motivation {
    pub id: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Exercise,
    Streak,
    Time,
    Social,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct QuestReward {
    pub experience: u64,
    pub points: u64,
    #[serde(default)]
    pub badge_id: Option<String>,
}

/// Time-boxed goal with a numeric target
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    pub reward: QuestReward,
    #[serde(default)]
    pub is_completed: bool,
    pub expires_at: DateTime<Utc>,
}

impl DailyQuest {
    /// Incomplete and past its expiry. The reducer never expires quests on its own.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && now > self.expires_at
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Streak,
    Challenges,
    Time,
    Social,
    Special,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Permanent goal unlocked once `current >= requirement`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub is_unlocked: bool,
    #[serde(default)]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub rarity: Rarity,
}

/// One row of an externally computed leaderboard
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub points: u64,
    pub level: u32,
    /// 1-based position
    pub rank: u32,
    pub streak: u32,
}

// ============================================================================
// Notification and Vocabulary Types
// ============================================================================

/// Display tag for notification icon/colour selection
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    Achievement,
    Quest,
    Streak,
    Social,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub action_url: Option<String>,
}

/// Word/translation pair (language-lesson variant)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VocabularyWord {
    pub id: String,
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub is_learned: bool,
    #[serde(default)]
    pub times_reviewed: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

// ============================================================================
// Application State
// ============================================================================

/// Immutable snapshot of the whole application state.
///
/// List branches sit behind `Arc` so successive snapshots share every branch
/// an action did not touch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    pub user: User,
    pub current_task: Option<Task>,
    pub completed_tasks: Arc<Vec<Task>>,
    pub badges: Arc<Vec<Badge>>,
    pub motivations: Arc<Vec<Motivation>>,
    pub notifications_enabled: bool,
    pub has_completed_onboarding: bool,
    pub has_completed_profile_registration: bool,
    pub daily_quests: Arc<Vec<DailyQuest>>,
    pub achievements: Arc<Vec<Achievement>>,
    pub leaderboard: Arc<Vec<LeaderboardEntry>>,
    /// Most recent first
    pub notifications: Arc<Vec<Notification>>,
    pub vocabulary: Arc<Vec<VocabularyWord>>,
    pub last_activity_date: Option<DateTime<Utc>>,
}

impl AppState {
    /// Empty state around a user; the seed module fills in the rest
    pub fn for_user(user: User) -> Self {
        Self {
            user,
            current_task: None,
            completed_tasks: Arc::default(),
            badges: Arc::default(),
            motivations: Arc::default(),
            notifications_enabled: true,
            has_completed_onboarding: false,
            has_completed_profile_registration: false,
            daily_quests: Arc::default(),
            achievements: Arc::default(),
            leaderboard: Arc::default(),
            notifications: Arc::default(),
            vocabulary: Arc::default(),
            last_activity_date: None,
        }
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn received_badges(&self) -> usize {
        self.badges.iter().filter(|b| b.is_received).count()
    }
}
