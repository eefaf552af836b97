//! The progression store: a total, synchronous reducer over [`AppState`].
//!
//! Every transition produces a new snapshot. Branches an action does not
//! touch are shared with the previous snapshot through their `Arc`, and an
//! action that matches nothing (for example an unknown notification id)
//! returns the previous snapshot itself, so callers can detect a no-op with
//! [`Arc::ptr_eq`].

use crate::progression::{apply_experience, apply_streak, ProgressionRules};
use crate::{AppState, LeaderboardEntry, Notification, Task, User, VocabularyWord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

/// The closed set of transitions the store accepts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SetUser(User),
    SetCurrentTask(Option<Task>),
    CompleteTask(Task),
    AddBadge(String),
    ToggleNotificationsEnabled,
    ResetProgress,
    UpdateUserTime(f64),
    AddExperience(u64),
    UpdateStreak(u32),
    AdvanceQuest { id: String, by: u32 },
    CompleteQuest(String),
    UpdateAchievementProgress { id: String, current: u32 },
    UnlockAchievement(String),
    AddNotification(Notification),
    MarkNotificationRead(String),
    UpdateLeaderboard(Vec<LeaderboardEntry>),
    AddVocabularyWord(VocabularyWord),
    LearnVocabularyWord(String),
    CompleteOnboarding,
    CompleteProfileRegistration,
}

impl Action {
    /// Tag name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetUser(_) => "SET_USER",
            Action::SetCurrentTask(_) => "SET_CURRENT_TASK",
            Action::CompleteTask(_) => "COMPLETE_TASK",
            Action::AddBadge(_) => "ADD_BADGE",
            Action::ToggleNotificationsEnabled => "TOGGLE_NOTIFICATIONS_ENABLED",
            Action::ResetProgress => "RESET_PROGRESS",
            Action::UpdateUserTime(_) => "UPDATE_USER_TIME",
            Action::AddExperience(_) => "ADD_EXPERIENCE",
            Action::UpdateStreak(_) => "UPDATE_STREAK",
            Action::AdvanceQuest { .. } => "ADVANCE_QUEST",
            Action::CompleteQuest(_) => "COMPLETE_QUEST",
            Action::UpdateAchievementProgress { .. } => "UPDATE_ACHIEVEMENT_PROGRESS",
            Action::UnlockAchievement(_) => "UNLOCK_ACHIEVEMENT",
            Action::AddNotification(_) => "ADD_NOTIFICATION",
            Action::MarkNotificationRead(_) => "MARK_NOTIFICATION_READ",
            Action::UpdateLeaderboard(_) => "UPDATE_LEADERBOARD",
            Action::AddVocabularyWord(_) => "ADD_VOCABULARY_WORD",
            Action::LearnVocabularyWord(_) => "LEARN_VOCABULARY_WORD",
            Action::CompleteOnboarding => "COMPLETE_ONBOARDING",
            Action::CompleteProfileRegistration => "COMPLETE_PROFILE_REGISTRATION",
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Source of the timestamps the reducer stamps onto entities
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reduce with the wall clock and default progression rules
pub fn reduce(state: &Arc<AppState>, action: Action) -> Arc<AppState> {
    reduce_at(state, action, Utc::now(), &ProgressionRules::default())
}

/// Produce the snapshot that follows `state` under `action` at instant `now`
///
/// Never fails. Returns `state` itself when the action matched nothing.
pub fn reduce_at(
    state: &Arc<AppState>,
    action: Action,
    now: DateTime<Utc>,
    rules: &ProgressionRules,
) -> Arc<AppState> {
    let base = || AppState::clone(state);

    let next = match action {
        Action::SetUser(user) => Some(AppState { user, ..base() }),

        Action::SetCurrentTask(task) => Some(AppState {
            current_task: task,
            ..base()
        }),

        Action::CompleteTask(task) => {
            let already_recorded = state
                .completed_tasks
                .iter()
                .any(|t| t.id == task.id && t.start_date == task.start_date);
            if already_recorded {
                None
            } else {
                let completed = Task {
                    is_accepted: true,
                    is_completed: true,
                    completed_at: Some(now),
                    actual_duration_minutes: task
                        .actual_duration_minutes
                        .or(Some(task.duration_minutes)),
                    ..task
                };
                let mut completed_tasks = Vec::clone(&state.completed_tasks);
                completed_tasks.push(completed);
                Some(AppState {
                    current_task: None,
                    completed_tasks: Arc::new(completed_tasks),
                    last_activity_date: Some(now),
                    ..base()
                })
            }
        }

        Action::AddBadge(id) => update_matching(
            &state.badges,
            |b| b.id == id && !b.is_received,
            |b| {
                b.is_received = true;
                b.received_at = Some(now);
            },
        )
        .map(|badges| AppState { badges, ..base() }),

        Action::ToggleNotificationsEnabled => Some(AppState {
            notifications_enabled: !state.notifications_enabled,
            ..base()
        }),

        Action::ResetProgress => {
            let badges = state
                .badges
                .iter()
                .cloned()
                .map(|b| crate::Badge {
                    is_received: false,
                    received_at: None,
                    ..b
                })
                .collect();
            Some(AppState {
                current_task: None,
                completed_tasks: Arc::default(),
                badges: Arc::new(badges),
                ..base()
            })
        }

        Action::UpdateUserTime(hours) => {
            let mut user = state.user.clone();
            user.time_in_app_hours += hours.max(0.0);
            Some(AppState { user, ..base() })
        }

        Action::AddExperience(amount) => {
            let mut user = state.user.clone();
            apply_experience(&mut user, amount, rules);
            Some(AppState { user, ..base() })
        }

        Action::UpdateStreak(streak) => {
            let mut user = state.user.clone();
            apply_streak(&mut user, streak);
            Some(AppState { user, ..base() })
        }

        Action::AdvanceQuest { id, by } => update_matching(
            &state.daily_quests,
            |q| q.id == id && !q.is_completed && by > 0,
            |q| q.current = q.current.saturating_add(by),
        )
        .map(|daily_quests| AppState {
            daily_quests,
            ..base()
        }),

        Action::CompleteQuest(id) => update_matching(
            &state.daily_quests,
            |q| q.id == id && !q.is_completed,
            |q| q.is_completed = true,
        )
        .map(|daily_quests| AppState {
            daily_quests,
            ..base()
        }),

        Action::UpdateAchievementProgress { id, current } => update_matching(
            &state.achievements,
            |a| a.id == id && !a.is_unlocked && a.current != current,
            |a| a.current = current,
        )
        .map(|achievements| AppState {
            achievements,
            ..base()
        }),

        Action::UnlockAchievement(id) => update_matching(
            &state.achievements,
            |a| a.id == id && !a.is_unlocked,
            |a| {
                a.is_unlocked = true;
                a.unlocked_at = Some(now);
            },
        )
        .map(|achievements| AppState {
            achievements,
            ..base()
        }),

        Action::AddNotification(notification) => {
            let mut notifications = Vec::with_capacity(state.notifications.len() + 1);
            notifications.push(notification);
            notifications.extend(state.notifications.iter().cloned());
            Some(AppState {
                notifications: Arc::new(notifications),
                ..base()
            })
        }

        Action::MarkNotificationRead(id) => update_matching(
            &state.notifications,
            |n| n.id == id && !n.is_read,
            |n| n.is_read = true,
        )
        .map(|notifications| AppState {
            notifications,
            ..base()
        }),

        Action::UpdateLeaderboard(entries) => Some(AppState {
            leaderboard: Arc::new(entries),
            ..base()
        }),

        Action::AddVocabularyWord(word) => {
            let mut vocabulary = Vec::clone(&state.vocabulary);
            vocabulary.push(word);
            Some(AppState {
                vocabulary: Arc::new(vocabulary),
                ..base()
            })
        }

        Action::LearnVocabularyWord(id) => {
            let newly_learned = state
                .vocabulary
                .iter()
                .filter(|w| w.id == id && !w.is_learned)
                .count() as u32;
            update_matching(
                &state.vocabulary,
                |w| w.id == id,
                |w| {
                    w.is_learned = true;
                    w.times_reviewed = w.times_reviewed.saturating_add(1);
                    w.last_reviewed = Some(now);
                },
            )
            .map(|vocabulary| {
                let mut user = state.user.clone();
                user.words_learned = user.words_learned.saturating_add(newly_learned);
                AppState {
                    user,
                    vocabulary,
                    ..base()
                }
            })
        }

        Action::CompleteOnboarding if !state.has_completed_onboarding => Some(AppState {
            has_completed_onboarding: true,
            ..base()
        }),

        Action::CompleteProfileRegistration if !state.has_completed_profile_registration => {
            Some(AppState {
                has_completed_profile_registration: true,
                ..base()
            })
        }

        Action::CompleteOnboarding | Action::CompleteProfileRegistration => None,
    };

    match next {
        Some(next) => Arc::new(next),
        None => Arc::clone(state),
    }
}

/// Rebuild `items` with `update` applied to every entry accepted by `matches`
///
/// Returns `None` when nothing matched so the caller can keep the old branch.
fn update_matching<T: Clone>(
    items: &Arc<Vec<T>>,
    matches: impl Fn(&T) -> bool,
    mut update: impl FnMut(&mut T),
) -> Option<Arc<Vec<T>>> {
    if !items.iter().any(&matches) {
        return None;
    }
    let updated = items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if matches(&item) {
                update(&mut item);
            }
            item
        })
        .collect();
    Some(Arc::new(updated))
}

// ============================================================================
// Store handle
// ============================================================================

/// Owns the current snapshot and serializes dispatches against it
///
/// Handed explicitly to whatever needs to read or change state.
pub struct Store {
    state: Arc<AppState>,
    rules: ProgressionRules,
    clock: Box<dyn Clock>,
}

impl Store {
    /// Store driven by the wall clock
    pub fn new(initial: AppState, rules: ProgressionRules) -> Self {
        Self::with_clock(initial, rules, SystemClock)
    }

    pub fn with_clock(initial: AppState, rules: ProgressionRules, clock: impl Clock + 'static) -> Self {
        Self {
            state: Arc::new(initial),
            rules,
            clock: Box::new(clock),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Apply one action and return the resulting snapshot
    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        let name = action.name();
        let next = reduce_at(&self.state, action, self.clock.now(), &self.rules);
        let changed = !Arc::ptr_eq(&next, &self.state);
        tracing::debug!(action = name, changed, "dispatch");
        self.state = next;
        self.snapshot()
    }

    /// Apply actions in order, returning the final snapshot
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Arc<AppState> {
        for action in actions {
            self.dispatch(action);
        }
        self.snapshot()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
