//! Completion workflow: which actions follow from a user gesture.
//!
//! The reducer applies one action at a time and trusts its inputs. This
//! module holds the rules the presentation layer runs *before* dispatching:
//! - Accepting a pending task
//! - Completing an accepted task (experience, streak, quests, achievements, badge)
//! - Claiming a quest reward
//! - Ranking a leaderboard
//!
//! Every function reads a snapshot and returns actions; nothing here mutates state.

use crate::progression::ProgressionRules;
use crate::{
    AchievementCategory, Action, AppState, LeaderboardEntry, Notification, NotificationKind,
    QuestKind, TaskStatus, User,
};
use chrono::{DateTime, Utc};

/// Actions to dispatch for one task completion, plus what they award
#[derive(Clone, Debug)]
pub struct CompletionPlan {
    pub actions: Vec<Action>,
    pub experience_gained: u64,
    pub new_streak: u32,
    pub quests_completed: Vec<String>,
    pub achievements_unlocked: Vec<String>,
    pub badge_awarded: Option<String>,
}

/// Accept the current task if it is still pending
pub fn accept_current_task(state: &AppState, now: DateTime<Utc>) -> Option<Action> {
    let task = state.current_task.as_ref()?;
    if task.status() != TaskStatus::Pending {
        tracing::debug!("Current task {} is not pending, nothing to accept", task.id);
        return None;
    }
    tracing::info!("Accepting task {}: {}", task.id, task.title);
    Some(Action::SetCurrentTask(Some(task.accepted(now))))
}

/// Plan the completion of the accepted current task
///
/// ## Completion rules
///
/// 1. **Task**: `CompleteTask` moves it into the completed list
/// 2. **Experience**: base award plus a bonus per planned minutes
/// 3. **Streak**: one more than the current streak
/// 4. **Quests**: each open exercise quest advances by one; reaching the
///    target completes it and pays its experience reward
/// 5. **Achievements**: challenge and streak achievements track the new
///    totals and unlock when their requirement is met
/// 6. **Badge**: the first completion ever awards the first badge
///
/// Returns `None` unless there is an accepted, not yet completed task.
pub fn plan_completion(
    state: &AppState,
    rules: &ProgressionRules,
    now: DateTime<Utc>,
) -> Option<CompletionPlan> {
    let task = state.current_task.as_ref()?;
    if task.status() != TaskStatus::Accepted {
        tracing::debug!("Current task {} has not been accepted", task.id);
        return None;
    }

    let mut actions = vec![Action::CompleteTask(task.clone())];

    let task_experience = rules.task_experience(task.duration_minutes);
    let mut experience_gained = task_experience;
    actions.push(Action::AddExperience(task_experience));

    let new_streak = state.user.streak.saturating_add(1);
    actions.push(Action::UpdateStreak(new_streak));

    let mut quests_completed = Vec::new();
    for quest in state
        .daily_quests
        .iter()
        .filter(|q| !q.is_completed && q.kind == QuestKind::Exercise && q.current < q.target)
    {
        actions.push(Action::AdvanceQuest {
            id: quest.id.clone(),
            by: 1,
        });
        if quest.current + 1 >= quest.target {
            actions.push(Action::CompleteQuest(quest.id.clone()));
            actions.push(Action::AddExperience(quest.reward.experience));
            experience_gained = experience_gained.saturating_add(quest.reward.experience);
            quests_completed.push(quest.id.clone());
        }
    }

    let completed_count = state.completed_tasks.len() as u32 + 1;
    let mut achievements_unlocked = Vec::new();
    for achievement in state.achievements.iter().filter(|a| !a.is_unlocked) {
        let progress = match achievement.category {
            AchievementCategory::Challenges => completed_count,
            AchievementCategory::Streak => new_streak,
            _ => continue,
        };
        actions.push(Action::UpdateAchievementProgress {
            id: achievement.id.clone(),
            current: progress,
        });
        if progress >= achievement.requirement {
            actions.push(Action::UnlockAchievement(achievement.id.clone()));
            actions.push(Action::AddNotification(Notification {
                id: uuid::Uuid::new_v4().to_string(),
                title: "Achievement unlocked".into(),
                message: achievement.name.clone(),
                kind: NotificationKind::Achievement,
                is_read: false,
                created_at: now,
                action_url: None,
            }));
            achievements_unlocked.push(achievement.id.clone());
        }
    }

    let badge_awarded = if state.completed_tasks.is_empty() {
        state
            .badges
            .first()
            .filter(|b| !b.is_received)
            .map(|b| b.id.clone())
    } else {
        None
    };
    if let Some(ref badge_id) = badge_awarded {
        actions.push(Action::AddBadge(badge_id.clone()));
    }

    tracing::info!(
        "Planned completion of {}: +{} xp, streak {}, {} quest(s), {} achievement(s)",
        task.id,
        experience_gained,
        new_streak,
        quests_completed.len(),
        achievements_unlocked.len()
    );

    Some(CompletionPlan {
        actions,
        experience_gained,
        new_streak,
        quests_completed,
        achievements_unlocked,
        badge_awarded,
    })
}

/// Claim an open quest: complete it and pay its experience reward
pub fn claim_quest(state: &AppState, quest_id: &str) -> Option<Vec<Action>> {
    let quest = state
        .daily_quests
        .iter()
        .find(|q| q.id == quest_id && !q.is_completed)?;
    Some(vec![
        Action::CompleteQuest(quest.id.clone()),
        Action::AddExperience(quest.reward.experience),
    ])
}

/// Rank the user among rivals by points, highest first, positions from 1
pub fn build_leaderboard(user: &User, rivals: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = rivals.to_vec();
    entries.push(LeaderboardEntry {
        id: user.id.clone(),
        name: user.name.clone(),
        profile_picture: user.profile_picture.clone(),
        points: user.points,
        level: user.level,
        rank: 0,
        streak: user.streak,
    });

    // Stable sort keeps input order among ties
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initial_state;
    use crate::{Config, FixedClock, Store, Variant};
    use chrono::{Duration, TimeZone};

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
    }

    fn create_test_store() -> Store {
        let state = initial_state(Variant::SportChallenge, &Config::default(), test_now());
        Store::with_clock(state, ProgressionRules::default(), FixedClock::new(test_now()))
    }

    fn rival(id: &str, points: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            id: id.into(),
            name: format!("Player {}", id),
            profile_picture: None,
            points,
            level: 1,
            rank: 0,
            streak: 0,
        }
    }

    #[test]
    fn test_accept_pending_task() {
        let store = create_test_store();

        let action = accept_current_task(store.state(), test_now()).unwrap();

        match action {
            Action::SetCurrentTask(Some(task)) => {
                assert_eq!(task.status(), TaskStatus::Accepted);
                assert_eq!(task.accepted_at, Some(test_now()));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_accept_twice_is_refused() {
        let mut store = create_test_store();
        let action = accept_current_task(store.state(), test_now()).unwrap();
        store.dispatch(action);

        assert!(accept_current_task(store.state(), test_now()).is_none());
    }

    #[test]
    fn test_cannot_complete_unaccepted_task() {
        let store = create_test_store();
        assert!(plan_completion(store.state(), store.rules(), store.now()).is_none());
    }

    #[test]
    fn test_first_completion_full_flow() {
        let mut store = create_test_store();
        let accept = accept_current_task(store.state(), store.now()).unwrap();
        store.dispatch(accept);

        let plan = plan_completion(store.state(), store.rules(), store.now()).unwrap();
        // 50 + 10/5 for the task, 25 for the quest
        assert_eq!(plan.experience_gained, 52 + 25);
        assert_eq!(plan.new_streak, 1);
        assert_eq!(plan.quests_completed, vec!["1".to_string()]);
        assert_eq!(plan.achievements_unlocked, vec!["1".to_string()]);
        assert_eq!(plan.badge_awarded.as_deref(), Some("1"));

        let state = store.dispatch_all(plan.actions);

        assert!(state.current_task.is_none());
        assert_eq!(state.completed_tasks.len(), 1);
        assert_eq!(state.user.total_experience, 77);
        assert_eq!(state.user.experience, 77);
        assert_eq!(state.user.points, 26 + 12);
        assert_eq!(state.user.streak, 1);
        assert!(state.daily_quests[0].is_completed);
        assert_eq!(state.daily_quests[0].current, 1);
        assert!(state.achievements[0].is_unlocked);
        assert!(!state.achievements[1].is_unlocked);
        assert_eq!(state.achievements[1].current, 1);
        assert!(state.badges[0].is_received);
        assert_eq!(state.notifications[0].kind, NotificationKind::Achievement);
    }

    #[test]
    fn test_second_completion_awards_no_badge() {
        let mut store = create_test_store();
        for _ in 0..2 {
            if store.state().current_task.is_none() {
                let mut task = initial_state(Variant::SportChallenge, &Config::default(), store.now())
                    .current_task
                    .unwrap();
                task.id = "next".into();
                store.dispatch(Action::SetCurrentTask(Some(task)));
            }
            let accept = accept_current_task(store.state(), store.now()).unwrap();
            store.dispatch(accept);
            let plan = plan_completion(store.state(), store.rules(), store.now()).unwrap();
            if store.state().completed_tasks.is_empty() {
                assert!(plan.badge_awarded.is_some());
            } else {
                assert!(plan.badge_awarded.is_none());
                assert!(plan.quests_completed.is_empty());
                assert_eq!(plan.new_streak, 2);
            }
            store.dispatch_all(plan.actions);
        }
        assert_eq!(store.state().completed_tasks.len(), 2);
    }

    #[test]
    fn test_streak_achievement_unlocks_at_requirement() {
        let mut store = create_test_store();
        let mut user = store.state().user.clone();
        user.streak = 6;
        user.longest_streak = 6;
        store.dispatch(Action::SetUser(user));
        let accept = accept_current_task(store.state(), store.now()).unwrap();
        store.dispatch(accept);

        let plan = plan_completion(store.state(), store.rules(), store.now()).unwrap();

        assert_eq!(plan.new_streak, 7);
        assert!(plan.achievements_unlocked.contains(&"2".to_string()));
        let state = store.dispatch_all(plan.actions);
        assert!(state.achievements[1].is_unlocked);
        assert_eq!(state.user.longest_streak, 7);
    }

    #[test]
    fn test_claim_quest() {
        let mut store = create_test_store();

        let actions = claim_quest(store.state(), "1").unwrap();
        let state = store.dispatch_all(actions);

        assert!(state.daily_quests[0].is_completed);
        assert_eq!(state.user.total_experience, 25);
        assert!(claim_quest(&state, "1").is_none());
        assert!(claim_quest(&state, "missing").is_none());
    }

    #[test]
    fn test_build_leaderboard_ranks_by_points() {
        let mut user = initial_state(Variant::SportChallenge, &Config::default(), test_now()).user;
        user.points = 900;

        let board = build_leaderboard(&user, &[rival("a", 1250), rival("b", 680), rival("c", 980)]);

        let order: Vec<_> = board.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "1", "b"]);
        let ranks: Vec<_> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_leaderboard_dispatch_replaces_entries() {
        let mut store = create_test_store();
        let board = build_leaderboard(&store.state().user, &[rival("a", 10)]);

        let state = store.dispatch(Action::UpdateLeaderboard(board));

        assert_eq!(state.leaderboard.len(), 2);
        assert_eq!(state.leaderboard[0].id, "a");
    }

    #[test]
    fn test_expired_task_can_still_be_completed() {
        let state = initial_state(Variant::SportChallenge, &Config::default(), test_now());
        let clock = FixedClock::new(test_now());
        let mut store = Store::with_clock(state, ProgressionRules::default(), clock.clone());
        let accept = accept_current_task(store.state(), store.now()).unwrap();
        store.dispatch(accept);

        clock.advance(Duration::days(3));
        let task = store.state().current_task.clone().unwrap();
        assert!(task.is_expired(store.now()));

        let plan = plan_completion(store.state(), store.rules(), store.now()).unwrap();
        let state = store.dispatch_all(plan.actions);
        assert_eq!(state.completed_tasks.len(), 1);
    }
}
