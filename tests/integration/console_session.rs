//! Integration tests for the line console.
//!
//! Drives a `Console` over a spawned registry with a frozen clock, the same
//! way the binary does with stdin lines.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tasktrack::clock::ManualClock;
use tasktrack::config::AppConfig;
use tasktrack::console::{self, Console, ConsoleError, Reply};
use tasktrack::registry::{RegistryError, SortMode, Stats, TaskRegistry, spawn_registry};
use tasktrack_core::{Task, ValidationError};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Console over a fresh registry, clock frozen at 2026-10-16 09:00 UTC.
fn make_console(config: AppConfig) -> Console {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
    ));
    let registry = spawn_registry(TaskRegistry::with_clock(clock.clone()), 8);
    Console::new(registry, clock, config)
}

async fn run(console: &mut Console, line: &str) -> Reply {
    console
        .execute_line(line)
        .await
        .unwrap_or_else(|e| panic!("'{line}' failed: {e}"))
}

fn listed(reply: &Reply) -> Vec<&str> {
    match reply {
        Reply::Tasks { tasks, .. } => tasks.iter().map(|t| t.name.as_str()).collect(),
        other => panic!("expected a task list, got {other:?}"),
    }
}

fn touched(reply: &Reply) -> &Task {
    match reply {
        Reply::Task { task, .. } => task,
        other => panic!("expected a task, got {other:?}"),
    }
}

async fn seed(console: &mut Console) {
    run(console, "add high 2026-10-17 A | due tomorrow").await;
    run(console, "add low 2026-10-23 B | due next week").await;
    run(console, "add medium 2026-10-16 C | due today").await;
}

// ===========================================================================
// Session flow
// ===========================================================================

#[tokio::test]
async fn full_session() {
    let mut console = make_console(AppConfig::default());
    seed(&mut console).await;

    assert_eq!(console.view(), SortMode::Stack);
    assert_eq!(listed(&run(&mut console, "list").await), vec!["C", "B", "A"]);
    assert_eq!(
        listed(&run(&mut console, "sort priority").await),
        vec!["A", "C", "B"]
    );
    assert_eq!(console.view(), SortMode::Priority);
    assert_eq!(
        listed(&run(&mut console, "sort chrono").await),
        vec!["A", "B", "C"]
    );

    let urgent = run(&mut console, "urgent").await;
    assert_eq!(touched(&urgent).name, "A");
    assert!(touched(&urgent).is_completed());

    let next = run(&mut console, "next").await;
    assert_eq!(touched(&next).name, "B");

    assert_eq!(listed(&run(&mut console, "completed").await), vec!["B", "A"]);
    assert_eq!(listed(&run(&mut console, "list").await), vec!["C"]);

    assert_eq!(
        run(&mut console, "stats").await,
        Reply::Stats(Stats {
            pending: 1,
            in_progress: 1,
            completed: 2
        })
    );

    let undone = run(&mut console, "undo").await;
    assert_eq!(touched(&undone).name, "C");
    assert_eq!(run(&mut console, "quit").await, Reply::Quit);
}

#[tokio::test]
async fn done_and_remove_by_id() {
    let mut console = make_console(AppConfig::default());
    seed(&mut console).await;

    let done = run(&mut console, "done 2").await;
    assert_eq!(touched(&done).name, "B");
    assert!(touched(&done).is_completed());

    let removed = run(&mut console, "rm #1").await;
    assert_eq!(touched(&removed).name, "A");
    assert_eq!(
        run(&mut console, "rm 1").await,
        Reply::Message("no task #1".to_string())
    );

    let err = console.execute_line("done 1").await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Registry(RegistryError::NotFound(_))
    ));
}

#[tokio::test]
async fn empty_structures_report_messages() {
    let mut console = make_console(AppConfig::default());
    assert_eq!(
        run(&mut console, "next").await,
        Reply::Message("queue is empty".to_string())
    );
    assert_eq!(
        run(&mut console, "urgent").await,
        Reply::Message("priority queue is empty".to_string())
    );
    assert_eq!(
        run(&mut console, "undo").await,
        Reply::Message("nothing to undo".to_string())
    );
    assert_eq!(listed(&run(&mut console, "list").await), Vec::<&str>::new());
}

// ===========================================================================
// Validation at the console boundary
// ===========================================================================

#[tokio::test]
async fn past_due_date_is_rejected_by_default() {
    let mut console = make_console(AppConfig::default());
    let err = console
        .execute_line("add high 2026-10-15 Late | yesterday")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::DueDateInPast { .. })
    ));
    assert_eq!(run(&mut console, "stats").await, Reply::Stats(Stats::default()));
}

#[tokio::test]
async fn past_due_date_allowed_by_config() {
    let mut console = make_console(AppConfig {
        allow_past_due_dates: true,
        ..AppConfig::default()
    });
    let added = run(&mut console, "add high 2020-01-01 Late | long overdue").await;
    assert_eq!(touched(&added).due_date.to_string(), "2020-01-01");
}

#[tokio::test]
async fn malformed_due_date_is_rejected() {
    let mut console = make_console(AppConfig::default());
    let err = console
        .execute_line("add low 16/10/2026 X | y")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::InvalidDueDate(_))
    ));
}

#[tokio::test]
async fn empty_name_is_rejected_by_registry() {
    let mut console = make_console(AppConfig::default());
    let err = console
        .execute_line("add low 2099-01-01 | description only")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ConsoleError::Registry(RegistryError::Validation(ValidationError::EmptyName))
    );
}

// ===========================================================================
// Rendering
// ===========================================================================

#[tokio::test]
async fn configured_view_and_json_rendering() {
    let config = AppConfig {
        default_view: SortMode::Priority,
        json: true,
        ..AppConfig::default()
    };
    let mut console = make_console(config);
    seed(&mut console).await;

    let reply = run(&mut console, "list").await;
    let out = console::render(&reply, console.config());
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["title"], "Pending (priority)");
    assert_eq!(value["tasks"][0]["name"], "A");
    assert_eq!(value["tasks"][2]["name"], "B");

    let stats = run(&mut console, "stats").await;
    let value: serde_json::Value =
        serde_json::from_str(&console::render(&stats, console.config())).unwrap();
    assert_eq!(value["in_progress"], 3);
}

#[tokio::test]
async fn text_rendering_of_a_listing() {
    let mut console = make_console(AppConfig::default());
    seed(&mut console).await;
    let reply = run(&mut console, "sort priority").await;
    let out = console::render(&reply, console.config());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Pending (priority)");
    assert!(lines[1].starts_with("# | Name"));
    assert!(lines[3].starts_with("1 | A"));
    assert!(lines[3].ends_with("High"));
    assert_eq!(lines.len(), 6);
}
