//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::rotator::{MessageList, Schedule, DEFAULT_ELEMENT_ID};
use crate::web::is_valid_element_id;

/// Comma-separated messages, read when no `--message` is given
pub const MESSAGES_ENV: &str = "ROTATOR_MESSAGES";

/// Message Rotator - Cycle landing page messages in the terminal or a browser
#[derive(Parser, Debug, Clone)]
#[command(name = "message-rotator")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose/debug logging
    #[arg(short, long, env = "ROTATOR_VERBOSE")]
    pub verbose: bool,

    /// Output surface changes as JSON lines (useful for piping to other tools)
    #[arg(long, env = "ROTATOR_JSON")]
    pub json: bool,

    /// Message to rotate (repeat for several; defaults to the landing page set,
    /// or the comma-separated ROTATOR_MESSAGES)
    #[arg(short, long = "message", value_name = "TEXT")]
    pub messages: Vec<String>,

    /// Milliseconds between two rotations
    #[arg(
        long,
        default_value = "3000",
        env = "ROTATOR_INTERVAL_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Milliseconds to hold the faded-out state before swapping text
    #[arg(long, default_value = "0", env = "ROTATOR_FADE_MS")]
    pub fade_ms: u64,

    /// Stop after this many rotations (runs until Ctrl+C by default)
    #[arg(
        long,
        env = "ROTATOR_CYCLES",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub cycles: Option<u64>,

    /// Start web server mode (serves the landing page)
    #[arg(long, env = "ROTATOR_WEB")]
    pub web: bool,

    /// Port for web server (default: 3000)
    #[arg(long, default_value = "3000", env = "ROTATOR_PORT")]
    pub port: u16,

    /// Host address to bind web server to (default: 0.0.0.0)
    #[arg(long, default_value = "0.0.0.0", env = "ROTATOR_HOST")]
    pub host: String,

    /// Id of the page element that shows the messages
    #[arg(
        long,
        default_value = DEFAULT_ELEMENT_ID,
        env = "ROTATOR_ELEMENT_ID",
        value_parser = parse_element_id
    )]
    pub element_id: String,

    /// Directory with a custom index.html to serve instead of the built-in page
    #[arg(long, value_name = "DIR", env = "ROTATOR_WEB_DIR")]
    pub web_dir: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Messages from `--message`, then `ROTATOR_MESSAGES`, then the landing page defaults
    pub fn message_list(&self) -> Result<MessageList> {
        self.message_list_from(std::env::var(MESSAGES_ENV).ok())
    }

    fn message_list_from(&self, env_messages: Option<String>) -> Result<MessageList> {
        if !self.messages.is_empty() {
            return MessageList::new(
                self.messages
                    .iter()
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty()),
            );
        }

        match env_messages {
            Some(value) => MessageList::new(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty()),
            ),
            None => Ok(MessageList::default()),
        }
    }

    /// Problems with the configuration that don't stop the run
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.fade_ms >= self.interval_ms {
            warnings.push(format!(
                "Fade hold ({} ms) is not shorter than the interval ({} ms), messages will barely show",
                self.fade_ms, self.interval_ms
            ));
        }
        warnings
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            interval: Duration::from_millis(self.interval_ms),
            fade: Duration::from_millis(self.fade_ms),
            max_cycles: self.cycles,
        }
    }
}

fn parse_element_id(value: &str) -> std::result::Result<String, String> {
    if is_valid_element_id(value) {
        Ok(value.to_string())
    } else {
        Err("must start with a letter and contain only letters, digits, '-' and '_'".to_string())
    }
}
