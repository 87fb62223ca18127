//! CLI - Command Line Interface for cinegrid
//!
//! Every catalog operation the TUI performs is scriptable. All output is
//! JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse the catalog
//! cinegrid discover --genre 28 --year 1999 --sort vote_average.desc
//!
//! # Search and inspect
//! cinegrid search "blade runner" --json
//! cinegrid info 78
//!
//! # Durable state
//! cinegrid recent --limit 5
//! cinegrid filters --clear
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::SortKey;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit status, stable for scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    InvalidArgs = 2,
    /// Transport failure, rate limit or TMDB 5xx
    NetworkError = 3,
    NotFound = 4,
    /// No API key, or TMDB rejected it
    ConfigError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Top-level arguments; no subcommand means the TUI
#[derive(Parser, Debug)]
#[command(
    name = "cinegrid",
    version,
    about = "Browse the TMDB movie catalog from the terminal",
    long_about = "A keyboard-driven movie catalog: an infinitely scrolling poster grid, \
                  genre/year/sort filters, debounced search and a detail view with cast.\n\n\
                  With no subcommand the interactive TUI starts; subcommands print \
                  results for scripts.",
    after_help = "EXAMPLES:\n\
                  cinegrid                               Launch interactive TUI\n\
                  cinegrid discover --genre 28 --page 2  Browse action movies\n\
                  cinegrid search \"heat\" --json          Search for movies\n\
                  cinegrid info 949                      Movie details with cast"
)]
pub struct Cli {
    /// Emit the JSON envelope (implied when stdout is not a terminal)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Only print data and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Config file to use instead of ~/.config/cinegrid/config.toml
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse the catalog with optional filters
    #[command(visible_alias = "d")]
    Discover(DiscoverCmd),

    /// Search movies by title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details and cast for a movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List the movie genres
    #[command(visible_alias = "g")]
    Genres(GenresCmd),

    /// Show recently viewed movies
    #[command(visible_alias = "r")]
    Recent(RecentCmd),

    /// Show or reset the saved browse filters
    #[command(visible_alias = "f")]
    Filters(FiltersCmd),
}

// =============================================================================
// Discover Command
// =============================================================================

/// One page of the discover listing
#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Genre id to include (repeatable; all must match)
    #[arg(long = "genre", short = 'g')]
    pub genres: Vec<u64>,

    /// Primary release year
    #[arg(long, short = 'y')]
    pub year: Option<u16>,

    /// Sort order, e.g. popularity.desc or vote_average.desc
    #[arg(long, short = 's')]
    pub sort: Option<SortKey>,

    /// Print at most this many movies
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

// =============================================================================
// Search Command
// =============================================================================

/// Title search, one page at a time
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Title text to match
    pub query: String,

    /// Page number (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

// =============================================================================
// Info Command
// =============================================================================

/// Full details and cast; the movie is added to recently viewed
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB movie id
    pub id: u64,
}

// =============================================================================
// Genres / Recent / Filters Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct GenresCmd {}

/// Movies opened with `info` or in the TUI, newest first
#[derive(Args, Debug)]
pub struct RecentCmd {
    /// Maximum number of entries
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct FiltersCmd {
    /// Reset the saved filters
    #[arg(long)]
    pub clear: bool,
}

// =============================================================================
// JSON Envelope
// =============================================================================

/// `{success, data}` on success, `{success, error, exit_code}` on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_success", default)]
    pub exit_code: i32,
}

fn is_success(code: &i32) -> bool {
    *code == ExitCode::Success as i32
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            exit_code: ExitCode::Success.into(),
        }
    }
}

impl JsonOutput<()> {
    pub fn failure(message: impl Into<String>, code: ExitCode) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Routes command results to stdout and diagnostics to stderr
///
/// Data always goes to stdout, as the envelope in JSON mode or as the
/// `human` rendering otherwise. Errors and progress notes go to stderr so a
/// pipe only ever sees data.
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    pub fn print<T: Serialize>(
        &self,
        data: T,
        human: impl FnOnce(&T) -> String,
    ) -> anyhow::Result<()> {
        let text = if self.json {
            serde_json::to_string_pretty(&JsonOutput::success(data))?
        } else {
            human(&data)
        };
        println!("{}", text);
        Ok(())
    }

    /// Report a failure; returns `code` so handlers can `return output.error(..)`
    pub fn error(&self, message: impl Into<String>, code: ExitCode) -> ExitCode {
        let message = message.into();
        if self.json {
            match serde_json::to_string_pretty(&JsonOutput::failure(message.as_str(), code)) {
                Ok(json) => eprintln!("{}", json),
                Err(e) => tracing::error!("failed to encode error envelope: {}", e),
            }
        } else if !self.quiet {
            eprintln!("Error: {}", message);
        }
        code
    }

    /// Progress note, human mode only
    pub fn info(&self, message: impl std::fmt::Display) {
        if !(self.quiet || self.json) {
            eprintln!("{}", message);
        }
    }
}
