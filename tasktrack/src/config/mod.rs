//! Configuration for the `tasktrack` console.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/tasktrack/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};

use crate::registry::SortMode;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// `ui.date_format` contains a specifier chrono does not understand.
    #[error("invalid date_format '{0}'")]
    InvalidDateFormat(String),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    tasks: TasksFileConfig,
    ui: UiFileConfig,
    runtime: RuntimeFileConfig,
}

/// `[tasks]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct TasksFileConfig {
    allow_past_due_dates: Option<bool>,
    default_view: Option<SortMode>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    date_format: Option<String>,
    json: Option<bool>,
}

/// `[runtime]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct RuntimeFileConfig {
    channel_capacity: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // -- Tasks --
    /// Accept due dates earlier than today.
    pub allow_past_due_dates: bool,
    /// View used by `list` until `sort` changes it.
    pub default_view: SortMode,

    // -- UI --
    /// chrono format string for the Added and Due columns.
    pub date_format: String,
    /// Print JSON instead of tables.
    pub json: bool,

    // -- Runtime --
    /// Capacity of the registry command channel.
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_past_due_dates: false,
            default_view: SortMode::Stack,
            date_format: "%Y-%m-%d".to_string(),
            json: false,
            channel_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// Otherwise the default path is tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            allow_past_due_dates: cli.allow_past_due
                || file
                    .tasks
                    .allow_past_due_dates
                    .unwrap_or(defaults.allow_past_due_dates),
            default_view: cli
                .sort
                .or(file.tasks.default_view)
                .unwrap_or(defaults.default_view),
            date_format: file
                .ui
                .date_format
                .clone()
                .unwrap_or(defaults.date_format),
            json: cli.json || file.ui.json.unwrap_or(defaults.json),
            channel_capacity: file
                .runtime
                .channel_capacity
                .unwrap_or(defaults.channel_capacity),
        };
        validate_date_format(&config.date_format)?;
        Ok(config)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task tracker with stack, queue and priority views")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/tasktrack/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial view: stack, priority or chrono.
    #[arg(long, env = "TASKTRACK_SORT")]
    pub sort: Option<SortMode>,

    /// Print JSON instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Accept due dates earlier than today.
    #[arg(long)]
    pub allow_past_due: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKTRACK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/tasktrack.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Rejects chrono format strings that would fail at render time.
fn validate_date_format(fmt: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidDateFormat(fmt.to_string()));
    }
    Ok(())
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("tasktrack").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
