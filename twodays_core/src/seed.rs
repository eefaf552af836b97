//! Built-in initial state and task templates for both app variants.
//!
//! The seed is configuration, not reducer logic: it is built once per
//! process and handed to the store as its first snapshot.

use crate::types::*;
use crate::{Config, Variant};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// Static description of a task the app can hand out
#[derive(Clone, Debug)]
pub struct TaskTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
}

impl TaskTemplate {
    fn new(id: &str, title: &str, description: &str, duration_minutes: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            duration_minutes,
        }
    }

    /// A pending task open from `now` until `now + window`
    pub fn instantiate(&self, id: String, now: DateTime<Utc>, window: Duration) -> Task {
        Task {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            duration_minutes: self.duration_minutes,
            is_accepted: false,
            is_completed: false,
            start_date: now,
            end_date: now + window,
            accepted_at: None,
            completed_at: None,
            actual_duration_minutes: None,
        }
    }
}

/// Cached task templates per variant
static TASK_TEMPLATES: Lazy<HashMap<Variant, Vec<TaskTemplate>>> = Lazy::new(|| {
    let mut templates = HashMap::new();

    templates.insert(
        Variant::SportChallenge,
        vec![
            TaskTemplate::new(
                "1",
                "Do a light stretch for 10 minutes",
                "A simple stretching routine to improve flexibility and reduce muscle tension.",
                10,
            ),
            TaskTemplate::new(
                "2",
                "Take a 15-minute walk",
                "A gentle walk to get your body moving and improve circulation.",
                15,
            ),
            TaskTemplate::new(
                "3",
                "Do 20 push-ups",
                "Build upper body strength with this classic exercise.",
                5,
            ),
            TaskTemplate::new(
                "4",
                "Practice deep breathing for 5 minutes",
                "Focus on your breath to reduce stress and improve mindfulness.",
                5,
            ),
            TaskTemplate::new(
                "5",
                "Do 30 squats",
                "Strengthen your legs and glutes with this bodyweight exercise.",
                8,
            ),
        ],
    );

    templates.insert(
        Variant::LanguageLesson,
        vec![
            TaskTemplate::new(
                "1",
                "Learn 10 new words",
                "Pick ten everyday words and practice them until they stick.",
                10,
            ),
            TaskTemplate::new(
                "2",
                "Listen to a 15-minute podcast",
                "Train your ear with natural speech at native speed.",
                15,
            ),
            TaskTemplate::new(
                "3",
                "Write five sentences",
                "Use new vocabulary in sentences about your day.",
                5,
            ),
            TaskTemplate::new(
                "4",
                "Read a short article",
                "Read one short text and look up the words you do not know.",
                12,
            ),
            TaskTemplate::new(
                "5",
                "Practice pronunciation",
                "Repeat after a native speaker for a few minutes.",
                8,
            ),
        ],
    );

    templates
});

/// Task templates for a variant
pub fn task_templates(variant: Variant) -> &'static [TaskTemplate] {
    TASK_TEMPLATES
        .get(&variant)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// A fresh pending task drawn at random from the variant's templates
pub fn random_task<R: Rng + ?Sized>(
    variant: Variant,
    rng: &mut R,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<Task> {
    let template = task_templates(variant).choose(rng)?;
    let task = template.instantiate(uuid::Uuid::new_v4().to_string(), now, window);
    tracing::debug!("Drew task template {}: {}", template.id, task.title);
    Some(task)
}

/// Builds the initial snapshot for a variant
///
/// Contains one pending task, one badge, one motivation, one daily quest,
/// two achievements and two unread notifications. Onboarding and profile
/// registration start incomplete unless the config says otherwise.
pub fn initial_state(variant: Variant, config: &Config, now: DateTime<Utc>) -> AppState {
    let window = Duration::days(config.progression.task_window_days);
    let noun = config.vocabulary_for(variant).noun;

    let default_name = match variant {
        Variant::SportChallenge => "Nick",
        Variant::LanguageLesson => "Alex",
    };
    let name = config
        .seed
        .user_name
        .clone()
        .unwrap_or_else(|| default_name.into());
    let user = User::new(
        "1",
        name,
        Sex::Man,
        now,
        config.progression.base_experience_to_next_level,
    );

    let current_task = task_templates(variant)
        .first()
        .map(|template| template.instantiate(template.id.clone(), now, window));

    let badge = Badge {
        id: "1".into(),
        name: "Bronze Start".into(),
        description: format!(
            "Received for completing the first {} in the app. This is your first victory on the path to healthy habits.",
            noun.to_lowercase()
        ),
        icon: "🥉".into(),
        is_received: false,
        received_at: None,
        task_id: None,
    };

    let motivation = Motivation {
        id: "1".into(),
        text: match variant {
            Variant::SportChallenge => "YOUR 2 DAYS ARE YOUR CHALLENGE".into(),
            Variant::LanguageLesson => "EVERY WORD BRINGS YOU CLOSER".into(),
        },
        date: now,
    };

    let quest = DailyQuest {
        id: "1".into(),
        title: format!("Complete a {}", noun.to_lowercase()),
        description: format!("Finish one {} before the day is over.", noun.to_lowercase()),
        kind: QuestKind::Exercise,
        target: 1,
        current: 0,
        reward: QuestReward {
            experience: 25,
            points: 10,
            badge_id: None,
        },
        is_completed: false,
        expires_at: now + Duration::days(1),
    };

    let achievements = vec![
        Achievement {
            id: "1".into(),
            name: "First Steps".into(),
            description: format!("Complete your first {}.", noun.to_lowercase()),
            icon: "👣".into(),
            category: AchievementCategory::Challenges,
            requirement: 1,
            current: 0,
            is_unlocked: false,
            unlocked_at: None,
            rarity: Rarity::Common,
        },
        Achievement {
            id: "2".into(),
            name: "Week Warrior".into(),
            description: format!("Complete a {} seven times in a row.", noun.to_lowercase()),
            icon: "🔥".into(),
            category: AchievementCategory::Streak,
            requirement: 7,
            current: 0,
            is_unlocked: false,
            unlocked_at: None,
            rarity: Rarity::Rare,
        },
    ];

    let notifications = vec![
        Notification {
            id: "1".into(),
            title: format!("Welcome to {}", variant.app_name()),
            message: format!("Your first {} is waiting for you.", noun.to_lowercase()),
            kind: NotificationKind::Reminder,
            is_read: false,
            created_at: now,
            action_url: None,
        },
        Notification {
            id: "2".into(),
            title: "New daily quest".into(),
            message: quest.title.clone(),
            kind: NotificationKind::Quest,
            is_read: false,
            created_at: now,
            action_url: None,
        },
    ];

    let skip_onboarding = config.seed.skip_onboarding;

    AppState {
        current_task,
        badges: Arc::new(vec![badge]),
        motivations: Arc::new(vec![motivation]),
        has_completed_onboarding: skip_onboarding,
        has_completed_profile_registration: skip_onboarding,
        daily_quests: Arc::new(vec![quest]),
        achievements: Arc::new(achievements),
        notifications: Arc::new(notifications),
        ..AppState::for_user(user)
    }
}
