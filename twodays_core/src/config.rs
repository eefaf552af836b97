//! Configuration file support for TwoDays.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/twodays/config.toml`.

use crate::progression::MIN_LEVEL_MULTIPLIER;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub ranks: RankConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

/// Which front-end the store is instantiated for
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    SportChallenge,
    LanguageLesson,
}

impl Variant {
    pub fn app_name(self) -> &'static str {
        match self {
            Variant::SportChallenge => "2Days Sport Challenge",
            Variant::LanguageLesson => "LinguaQuest",
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sport" | "sport_challenge" | "challenge" => Ok(Variant::SportChallenge),
            "language" | "language_lesson" | "lesson" => Ok(Variant::LanguageLesson),
            other => Err(Error::Config(format!("Unknown variant: {}", other))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub variant: Variant,
}

/// Words the presentation layer uses for a task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskVocabulary {
    pub noun: String,
    pub accept_verb: String,
}

/// Optional overrides of the per-variant task vocabulary
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub noun: Option<String>,
    #[serde(default)]
    pub accept_verb: Option<String>,
}

/// Progression parameters configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_base_experience_to_next_level")]
    pub base_experience_to_next_level: u64,

    #[serde(default = "default_level_multiplier")]
    pub level_multiplier: f64,

    #[serde(default = "default_task_window_days")]
    pub task_window_days: i64,

    #[serde(default = "default_base_task_experience")]
    pub base_task_experience: u64,

    #[serde(default = "default_minutes_per_bonus_experience")]
    pub minutes_per_bonus_experience: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_experience_to_next_level: default_base_experience_to_next_level(),
            level_multiplier: default_level_multiplier(),
            task_window_days: default_task_window_days(),
            base_task_experience: default_base_task_experience(),
            minutes_per_bonus_experience: default_minutes_per_bonus_experience(),
        }
    }
}

/// Minimum points for each rank above Bronze
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_silver")]
    pub silver: u64,
    #[serde(default = "default_gold")]
    pub gold: u64,
    #[serde(default = "default_platinum")]
    pub platinum: u64,
    #[serde(default = "default_diamond")]
    pub diamond: u64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            silver: default_silver(),
            gold: default_gold(),
            platinum: default_platinum(),
            diamond: default_diamond(),
        }
    }
}

/// Overrides applied to the built-in initial state
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub user_name: Option<String>,

    /// Start with onboarding already done
    #[serde(default)]
    pub skip_onboarding: bool,
}

// Default value functions
fn default_base_experience_to_next_level() -> u64 {
    100
}

fn default_level_multiplier() -> f64 {
    1.2
}

fn default_task_window_days() -> i64 {
    2
}

fn default_base_task_experience() -> u64 {
    50
}

fn default_minutes_per_bonus_experience() -> u32 {
    5
}

fn default_silver() -> u64 {
    500
}

fn default_gold() -> u64 {
    1500
}

fn default_platinum() -> u64 {
    3000
}

fn default_diamond() -> u64 {
    6000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::info!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("twodays").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject parameter combinations the progression rules cannot work with
    pub fn validate(&self) -> Result<()> {
        let p = &self.progression;
        if p.base_experience_to_next_level == 0 {
            return Err(Error::Config(
                "base_experience_to_next_level must be positive".into(),
            ));
        }
        if !(p.level_multiplier >= MIN_LEVEL_MULTIPLIER) {
            return Err(Error::Config(format!(
                "level_multiplier must be at least {}, got {}",
                MIN_LEVEL_MULTIPLIER, p.level_multiplier
            )));
        }
        if p.task_window_days <= 0 {
            return Err(Error::Config("task_window_days must be positive".into()));
        }
        if p.minutes_per_bonus_experience == 0 {
            return Err(Error::Config(
                "minutes_per_bonus_experience must be positive".into(),
            ));
        }

        let r = &self.ranks;
        if !(r.silver < r.gold && r.gold < r.platinum && r.platinum < r.diamond) {
            return Err(Error::Config(
                "rank thresholds must be strictly increasing".into(),
            ));
        }
        Ok(())
    }

    /// Task vocabulary for the configured variant, with overrides applied
    pub fn task_vocabulary(&self) -> TaskVocabulary {
        self.vocabulary_for(self.app.variant)
    }

    /// Task vocabulary for an explicit variant, with overrides applied
    pub fn vocabulary_for(&self, variant: Variant) -> TaskVocabulary {
        let (noun, verb) = match variant {
            Variant::SportChallenge => ("Challenge", "Accept"),
            Variant::LanguageLesson => ("Lesson", "Start"),
        };
        TaskVocabulary {
            noun: self.vocabulary.noun.clone().unwrap_or_else(|| noun.into()),
            accept_verb: self
                .vocabulary
                .accept_verb
                .clone()
                .unwrap_or_else(|| verb.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app.variant, Variant::SportChallenge);
        assert_eq!(config.progression.base_experience_to_next_level, 100);
        assert_eq!(config.progression.level_multiplier, 1.2);
        assert_eq!(config.progression.task_window_days, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.progression.base_task_experience,
            parsed.progression.base_task_experience
        );
        assert_eq!(config.ranks.diamond, parsed.ranks.diamond);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[app]
variant = "language_lesson"

[progression]
level_multiplier = 1.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.app.variant, Variant::LanguageLesson);
        assert_eq!(config.progression.level_multiplier, 1.5);
        assert_eq!(config.progression.base_experience_to_next_level, 100); // default
    }

    #[test]
    fn test_vocabulary_follows_variant() {
        let mut config = Config::default();
        assert_eq!(config.task_vocabulary().noun, "Challenge");

        config.app.variant = Variant::LanguageLesson;
        let vocab = config.task_vocabulary();
        assert_eq!(vocab.noun, "Lesson");
        assert_eq!(vocab.accept_verb, "Start");

        config.vocabulary.noun = Some("Drill".into());
        assert_eq!(config.task_vocabulary().noun, "Drill");
    }

    #[test]
    fn test_validate_rejects_shrinking_multiplier() {
        let mut config = Config::default();
        config.progression.level_multiplier = 0.8;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_flat_multiplier() {
        let mut config = Config::default();
        config.progression.level_multiplier = 1.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.progression.level_multiplier = MIN_LEVEL_MULTIPLIER;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unordered_ranks() {
        let mut config = Config::default();
        config.ranks.gold = config.ranks.silver;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.seed.user_name = Some("Ana".into());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.seed.user_name.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_load_from_invalid_values_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[progression]\ntask_window_days = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("lesson".parse::<Variant>().unwrap(), Variant::LanguageLesson);
        assert_eq!("Sport".parse::<Variant>().unwrap(), Variant::SportChallenge);
        assert!("chess".parse::<Variant>().is_err());
    }
}
