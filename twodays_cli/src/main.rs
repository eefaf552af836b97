use clap::{Parser, Subcommand};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use twodays_core::helpers::{completion_summary, quest_time_left};
use twodays_core::motivation::{daily_motivation, random_motivation};
use twodays_core::*;

#[derive(Parser)]
#[command(name = "twodays")]
#[command(about = "Challenge and lesson progression tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// App variant (sport, language)
    #[arg(long, global = true)]
    variant: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of the initial state (default)
    Status,

    /// Reduce a JSON Lines file of actions from the initial state and print the result
    Replay {
        /// Action script, or '-' for stdin
        file: PathBuf,

        /// Pretty-print the resulting snapshot
        #[arg(long)]
        pretty: bool,
    },

    /// Accept and complete tasks in a row, printing what each one awards
    Complete {
        /// Number of tasks to complete
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Print the motivation of the day
    Motivation {
        /// Pick a random quote instead
        #[arg(long)]
        random: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    twodays_core::logging::init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(ref variant) = cli.variant {
        config.app.variant = variant.parse()?;
    }

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&config),
        Some(Commands::Replay { file, pretty }) => cmd_replay(&config, &file, pretty),
        Some(Commands::Complete { count }) => cmd_complete(&config, count),
        Some(Commands::Motivation { random }) => {
            let quote = if random {
                random_motivation(&mut rand::thread_rng())
            } else {
                daily_motivation(chrono::Utc::now())
            };
            println!("{}", quote);
            Ok(())
        }
    }
}

fn new_store(config: &Config) -> Store {
    let state = initial_state(config.app.variant, config, chrono::Utc::now());
    Store::new(state, ProgressionRules::from(config))
}

fn cmd_status(config: &Config) -> Result<()> {
    let store = new_store(config);
    let state = store.state();
    let now = store.now();
    let vocab = config.task_vocabulary();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", config.app.variant.app_name());
    println!("╰─────────────────────────────────────────╯");
    println!();
    display_user(&state.user, now);

    println!();
    match state.current_task {
        Some(ref task) => {
            println!("  Current {}: {}", vocab.noun.to_lowercase(), task.title);
            println!("  Duration: {}", format_duration(u64::from(task.duration_minutes)));
            println!("  Status: {:?}", task.status());
            println!("  Time left: {}", time_remaining(task.end_date, now));
            if task.status() == TaskStatus::Pending {
                println!("  Next: {} it with `twodays complete`", vocab.accept_verb.to_lowercase());
            }
        }
        None => println!("  No current {}", vocab.noun.to_lowercase()),
    }

    println!();
    println!(
        "  Badges: {}/{} received",
        state.received_badges(),
        state.badges.len()
    );
    for quest in state.daily_quests.iter() {
        let left = if quest.is_completed {
            "done".to_string()
        } else if quest.is_expired(now) {
            "expired".to_string()
        } else {
            quest_time_left(quest.expires_at, now)
        };
        println!(
            "  Quest: {} ({:.0}%, {})",
            quest.title,
            progress_percentage(quest.current, quest.target).min(100.0),
            left
        );
    }
    println!("  Unread notifications: {}", state.unread_notifications());
    println!();
    println!("  \"{}\"", daily_motivation(now));
    println!();

    Ok(())
}

fn cmd_replay(config: &Config, file: &Path, pretty: bool) -> Result<()> {
    let actions = if file == Path::new("-") {
        read_actions(io::stdin().lock())?
    } else {
        read_actions(BufReader::new(std::fs::File::open(file)?))?
    };
    tracing::info!("Replaying {} actions", actions.len());

    let mut store = new_store(config);
    let state = store.dispatch_all(actions);

    let output = if pretty {
        serde_json::to_string_pretty(&*state)?
    } else {
        serde_json::to_string(&*state)?
    };
    println!("{}", output);
    Ok(())
}

/// Parse one action per non-empty line
fn read_actions(reader: impl BufRead) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        let action = serde_json::from_str::<Action>(&line).map_err(|source| Error::Replay {
            line: line_num + 1,
            source,
        })?;
        actions.push(action);
    }
    Ok(actions)
}

fn cmd_complete(config: &Config, count: u32) -> Result<()> {
    let mut store = new_store(config);
    let mut rng = rand::thread_rng();
    let window = chrono::Duration::days(config.progression.task_window_days);
    let vocab = config.task_vocabulary();

    for _ in 0..count {
        if store.state().current_task.is_none() {
            let task = random_task(config.app.variant, &mut rng, store.now(), window);
            store.dispatch(Action::SetCurrentTask(task));
        }

        let title = match store.state().current_task {
            Some(ref task) => task.title.clone(),
            None => break,
        };

        if let Some(accept) = accept_current_task(store.state(), store.now()) {
            store.dispatch(accept);
        }

        let Some(plan) = plan_completion(store.state(), store.rules(), store.now()) else {
            break;
        };
        store.dispatch_all(plan.actions);

        println!("\n✓ {} completed: {}", vocab.noun, title);
        println!("  +{} XP", plan.experience_gained);
        println!("  Streak: {}", plan.new_streak);
        if !plan.quests_completed.is_empty() {
            println!("  Quests completed: {}", plan.quests_completed.len());
        }
        for id in &plan.achievements_unlocked {
            if let Some(a) = store.state().achievements.iter().find(|a| &a.id == id) {
                println!("  Achievement unlocked: {} {}", a.icon, a.name);
            }
        }
        if let Some(ref id) = plan.badge_awarded {
            if let Some(b) = store.state().badges.iter().find(|b| &b.id == id) {
                println!("  New badge: {} {}", b.icon, b.name);
            }
        }
    }

    let state = store.state();
    let summary = completion_summary(state);
    println!();
    display_user(&state.user, store.now());
    println!(
        "  Completed: {} ({} total)",
        summary.completed_tasks,
        format_duration(summary.total_minutes)
    );
    println!();
    Ok(())
}

fn display_user(user: &User, now: chrono::DateTime<chrono::Utc>) {
    println!("  {} ({:?})", user.name, user.rank);
    println!(
        "  Level {}: {}/{} XP ({} total)",
        user.level, user.experience, user.experience_to_next_level, user.total_experience
    );
    println!("  Points: {}", user.points);
    println!(
        "  Streak: {} (longest {})",
        user.streak, user.longest_streak
    );
    println!(
        "  Days active: {}",
        days_active(user.registration_date, now)
    );
}
