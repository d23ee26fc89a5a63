//! Line-oriented console over a running registry.
//!
//! Each input line parses into a [`Command`]. [`Console::execute`] forwards
//! it to the registry task and returns a [`Reply`], which [`render`] turns
//! into a text table or JSON. The console checks due dates against today
//! before adding a task; the registry itself only checks that fields are
//! present.

use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use tasktrack_core::task::{ensure_not_past, parse_due_date};
use tasktrack_core::{Priority, Task, TaskId, ValidationError};
use thiserror::Error;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::registry::{RegistryError, RegistryHandle, SortMode, Stats};

/// Usage text printed by `help`.
pub const HELP: &str = "\
commands:
  add <priority> <YYYY-MM-DD> <name> | <description>
  done <id>          mark a task completed
  rm <id>            delete a task
  sort <mode>        stack, priority or chrono
  list               pending tasks in the current view
  completed          completed tasks
  next               complete the oldest arrival
  urgent             complete the most urgent task
  undo               delete the most recently added task
  stats              task counts
  help               this text
  quit               exit";

/// Errors produced while parsing or executing a console line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    /// The first word is not a known command.
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    /// A required argument was not supplied.
    #[error("missing {0}")]
    MissingArgument(&'static str),
    /// A task id did not parse.
    #[error("invalid task id '{0}'")]
    InvalidId(String),
    /// A sort mode did not parse.
    #[error("{0}")]
    InvalidSortMode(String),
    /// Input failed task validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The registry rejected the request.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task.
    Add {
        /// Priority tier.
        priority: Priority,
        /// Due date text, validated on execution.
        due_date: String,
        /// Task name.
        name: String,
        /// Task description.
        description: String,
    },
    /// Complete a task.
    Done(TaskId),
    /// Remove a task.
    Remove(TaskId),
    /// Switch the active view and list it.
    Sort(SortMode),
    /// List pending tasks in the active view.
    List,
    /// List completed tasks.
    Completed,
    /// Complete the oldest arrival.
    Next,
    /// Complete the most urgent task.
    Urgent,
    /// Delete the most recently added task.
    Undo,
    /// Show counts.
    Stats,
    /// Show usage.
    Help,
    /// Leave the console.
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<TaskId, ConsoleError> {
    let raw = arg.ok_or(ConsoleError::MissingArgument("task id"))?;
    raw.parse()
        .map_err(|_| ConsoleError::InvalidId(raw.to_string()))
}

/// Splits off the first whitespace-delimited word, skipping any run of
/// separators before and after it.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let (word, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    Some((word, rest.trim_start()))
}

fn parse_add(rest: &str) -> Result<Command, ConsoleError> {
    let (priority, rest) = next_word(rest).ok_or(ConsoleError::MissingArgument("priority"))?;
    let priority = priority.parse::<Priority>()?;
    let (due_date, text) = next_word(rest).ok_or(ConsoleError::MissingArgument("due date"))?;
    let due_date = due_date.to_string();
    let (name, description) = text
        .split_once('|')
        .ok_or(ConsoleError::MissingArgument("'|' between name and description"))?;
    Ok(Command::Add {
        priority,
        due_date,
        name: name.trim().to_string(),
        description: description.trim().to_string(),
    })
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = rest.split_whitespace().next();
        match word.to_ascii_lowercase().as_str() {
            "add" | "a" => parse_add(rest),
            "done" | "complete" => Ok(Self::Done(parse_id(arg)?)),
            "rm" | "remove" | "del" => Ok(Self::Remove(parse_id(arg)?)),
            "sort" => {
                let mode = arg.ok_or(ConsoleError::MissingArgument("sort mode"))?;
                mode.parse()
                    .map(Self::Sort)
                    .map_err(ConsoleError::InvalidSortMode)
            }
            "list" | "ls" => Ok(Self::List),
            "completed" => Ok(Self::Completed),
            "next" => Ok(Self::Next),
            "urgent" => Ok(Self::Urgent),
            "undo" => Ok(Self::Undo),
            "stats" => Ok(Self::Stats),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ConsoleError::UnknownCommand(other.to_string())),
        }
    }
}

/// Result of executing a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A task list with a heading.
    Tasks {
        /// Heading shown above the table.
        title: String,
        /// Tasks in display order.
        tasks: Vec<Task>,
    },
    /// A single task that an action touched.
    Task {
        /// Past-tense verb describing the action.
        action: &'static str,
        /// The affected task.
        task: Task,
    },
    /// Counts.
    Stats(Stats),
    /// Free-form message.
    Message(String),
    /// The console should exit.
    Quit,
}

/// Console state: the registry handle plus the active view.
pub struct Console {
    registry: RegistryHandle,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    view: SortMode,
}

impl Console {
    /// Creates a console over `registry`, starting in the configured view.
    #[must_use]
    pub fn new(registry: RegistryHandle, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        let view = config.default_view;
        Self {
            registry,
            clock,
            config,
            view,
        }
    }

    /// The view `list` currently renders.
    #[must_use]
    pub const fn view(&self) -> SortMode {
        self.view
    }

    /// The resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses and executes one input line.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if the line does not parse or the registry
    /// rejects the request.
    pub async fn execute_line(&mut self, line: &str) -> Result<Reply, ConsoleError> {
        let cmd: Command = line.parse()?;
        self.execute(cmd).await
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError`] if validation fails or the registry rejects
    /// the request.
    pub async fn execute(&mut self, cmd: Command) -> Result<Reply, ConsoleError> {
        tracing::debug!(?cmd, "console command");
        let reply = match cmd {
            Command::Add {
                priority,
                due_date,
                name,
                description,
            } => {
                self.check_due_date(&due_date)?;
                let task = self
                    .registry
                    .add_task(&name, &description, &due_date, priority)
                    .await?;
                Reply::Task {
                    action: "added",
                    task,
                }
            }
            Command::Done(id) => Reply::Task {
                action: "completed",
                task: self.registry.complete_task(id).await?,
            },
            Command::Remove(id) => match self.registry.remove_task(id).await? {
                Some(task) => Reply::Task {
                    action: "removed",
                    task,
                },
                None => Reply::Message(format!("no task #{id}")),
            },
            Command::Sort(mode) => {
                self.view = mode;
                self.list().await?
            }
            Command::List => self.list().await?,
            Command::Completed => Reply::Tasks {
                title: "Completed".to_string(),
                tasks: self.registry.completed_tasks().await?,
            },
            Command::Next => match self.registry.process_next_arrival().await? {
                Some(task) => Reply::Task {
                    action: "completed",
                    task,
                },
                None => Reply::Message("queue is empty".to_string()),
            },
            Command::Urgent => match self.registry.process_most_urgent().await? {
                Some(task) => Reply::Task {
                    action: "completed",
                    task,
                },
                None => Reply::Message("priority queue is empty".to_string()),
            },
            Command::Undo => match self.registry.undo_last_added().await? {
                Some(task) => Reply::Task {
                    action: "undone",
                    task,
                },
                None => Reply::Message("nothing to undo".to_string()),
            },
            Command::Stats => Reply::Stats(self.registry.stats().await?),
            Command::Help => Reply::Message(HELP.to_string()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    async fn list(&self) -> Result<Reply, ConsoleError> {
        Ok(Reply::Tasks {
            title: format!("Pending ({})", self.view),
            tasks: self.registry.reorder_by(self.view).await?,
        })
    }

    fn check_due_date(&self, raw: &str) -> Result<(), ValidationError> {
        if self.config.allow_past_due_dates || raw.trim().is_empty() {
            // Empty input is reported by the registry.
            return Ok(());
        }
        let due = parse_due_date(raw)?;
        let today = self.clock.today();
        ensure_not_past(due, today).inspect_err(|_| {
            tracing::warn!(%due, %today, "rejected past due date");
        })
    }
}

/// Renders a reply as text or, when `config.json` is set, as JSON.
#[must_use]
pub fn render(reply: &Reply, config: &AppConfig) -> String {
    if config.json {
        return render_json(reply);
    }
    match reply {
        Reply::Tasks { title, tasks } => {
            let mut out = format!("{title}\n");
            out.push_str(&render_table(tasks, &config.date_format));
            out
        }
        Reply::Task { action, task } => format!("{action} #{} {}", task.id, task.name),
        Reply::Stats(stats) => stats.to_string(),
        Reply::Message(msg) => msg.clone(),
        Reply::Quit => String::new(),
    }
}

fn render_json(reply: &Reply) -> String {
    let value = match reply {
        Reply::Tasks { title, tasks } => serde_json::json!({ "title": title, "tasks": tasks }),
        Reply::Task { action, task } => serde_json::json!({ "action": action, "task": task }),
        Reply::Stats(stats) => serde_json::json!(stats),
        Reply::Message(msg) => serde_json::json!({ "message": msg }),
        Reply::Quit => serde_json::Value::Null,
    };
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

const HEADERS: [&str; 6] = ["#", "Name", "Description", "Added", "Due", "Priority"];

/// Renders tasks as an aligned text table, or `No tasks` when empty.
#[must_use]
pub fn render_table(tasks: &[Task], date_format: &str) -> String {
    if tasks.is_empty() {
        return "No tasks".to_string();
    }
    let rows: Vec<[String; 6]> = tasks
        .iter()
        .map(|t| {
            [
                t.id.to_string(),
                t.name.clone(),
                t.description.clone(),
                format_date(&t.created_at.format(date_format)),
                format_date(&t.due_date.format(date_format)),
                t.priority.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

/// Writes a chrono formatter out, or `?` if the format string is invalid.
fn format_date(formatted: &impl std::fmt::Display) -> String {
    let mut out = String::new();
    if write!(out, "{formatted}").is_err() {
        return "?".to_string();
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
