#![forbid(unsafe_code)]

//! Core domain model and business logic for the TwoDays progression system.
//!
//! This crate provides:
//! - Domain types (user, tasks, badges, quests, achievements, notifications)
//! - The progression store (tagged actions, a total reducer, snapshots)
//! - Progression rules (experience, levels, streaks, ranks)
//! - Derived display helpers and the initial seed
//! - The completion workflow that turns gestures into actions

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod progression;
pub mod store;
pub mod seed;
pub mod helpers;
pub mod motivation;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, RankConfig, TaskVocabulary, Variant};
pub use progression::{apply_experience, apply_streak, ProgressionRules};
pub use store::{reduce, reduce_at, Action, Clock, FixedClock, Store, SystemClock};
pub use seed::{initial_state, random_task};
pub use helpers::{days_active, format_duration, progress_percentage, time_remaining};
pub use engine::{accept_current_task, build_leaderboard, claim_quest, plan_completion, CompletionPlan};
